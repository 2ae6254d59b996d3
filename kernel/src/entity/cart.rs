mod id;
mod kind;
mod quantity;
mod weeks;

pub use self::{id::*, kind::*, quantity::*, weeks::*};

use destructure::{Destructure, Mutation};
use error_stack::Report;
use vodca::References;

use crate::entity::common::Price;
use crate::entity::BookId;
use crate::KernelError;

/// A cart line item. `price` is derived from the unit-price snapshot,
/// quantity and rental duration; it is recomputed in full on every change
/// and never written directly.
#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct CartItem {
    id: CartItemId,
    book_id: BookId,
    title: String,
    author: String,
    image_url: String,
    kind: PurchaseKind,
    quantity: Quantity,
    rent_weeks: Option<RentWeeks>,
    security_deposit: Option<Price>,
    unit_price: Price,
    price: Price,
}

impl CartItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CartItemId,
        book_id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        image_url: impl Into<String>,
        kind: PurchaseKind,
        quantity: Quantity,
        rent_weeks: Option<RentWeeks>,
        security_deposit: Option<Price>,
        unit_price: Price,
    ) -> Self {
        let price = Self::line_total(
            kind,
            &quantity,
            rent_weeks.as_ref(),
            security_deposit.as_ref(),
            &unit_price,
        );
        Self {
            id,
            book_id,
            title: title.into(),
            author: author.into(),
            image_url: image_url.into(),
            kind,
            quantity,
            rent_weeks,
            security_deposit,
            unit_price,
            price,
        }
    }

    fn line_total(
        kind: PurchaseKind,
        quantity: &Quantity,
        rent_weeks: Option<&RentWeeks>,
        security_deposit: Option<&Price>,
        unit_price: &Price,
    ) -> Price {
        let quantity = i64::from(quantity.count());
        let unit = unit_price.amount();
        match kind {
            PurchaseKind::Buy => Price::new(unit * quantity),
            PurchaseKind::Rent => {
                let weeks = rent_weeks.map(|weeks| i64::from(weeks.count())).unwrap_or(1);
                let deposit = security_deposit.map(|price| price.amount()).unwrap_or(0);
                Price::new((unit * weeks + deposit) * quantity)
            }
        }
    }

    fn recompute(&mut self) {
        self.price = Self::line_total(
            self.kind,
            &self.quantity,
            self.rent_weeks.as_ref(),
            self.security_deposit.as_ref(),
            &self.unit_price,
        );
    }

    /// Full recompute from the unit price; repeated changes never drift.
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self.recompute();
        self
    }

    pub fn with_rent_weeks(mut self, weeks: RentWeeks) -> error_stack::Result<Self, KernelError> {
        if self.kind != PurchaseKind::Rent {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("only rental items carry a rent duration"));
        }
        self.rent_weeks = Some(weeks);
        self.recompute();
        Ok(self)
    }

    /// Adopts the identity issued by the remote store on insert; subsequent
    /// removes and updates use the durable reference.
    pub fn with_id(mut self, id: CartItemId) -> Self {
        self.id = id;
        self
    }
}
