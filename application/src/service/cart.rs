use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{CartQuery, DependOnCartQuery};
use kernel::interface::update::{CartModifier, DependOnCartModifier};
use kernel::prelude::entity::{
    BookId, CartItem, CartItemId, PurchaseKind, Quantity, RentWeeks,
};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{
    AddToCartDto, CartItemDto, ChangeQuantityDto, ChangeRentWeeksDto, RemoveCartItemDto,
};

#[async_trait::async_trait]
pub trait CartService<Connection: Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnCartQuery<Connection>
    + DependOnCartModifier<Connection>
    + DependOnStoreState
{
    /// Optimistic add: the line appears locally first, then the store issues
    /// its durable identity. A failed insert takes the line back out.
    /// Guests keep a purely local cart.
    async fn add_to_cart(
        &mut self,
        dto: AddToCartDto,
    ) -> error_stack::Result<CartItemDto, KernelError> {
        let book_id = BookId::new(dto.book_id);
        let book = self
            .store_state()
            .book(&book_id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation)
                    .attach_printable("book is not in the catalogue")
            })?
            .clone();
        let quantity = Quantity::new(dto.quantity)?;
        let rent_weeks = dto.rent_weeks.map(RentWeeks::new).transpose()?;

        if dto.kind == PurchaseKind::Buy {
            let reserved: i32 = self
                .store_state()
                .cart()
                .iter()
                .filter(|item| item.book_id() == &book_id && *item.kind() == PurchaseKind::Buy)
                .map(|item| item.quantity().count())
                .sum();
            if !book.stock().covers(reserved + quantity.count()) {
                return Err(Report::new(KernelError::Validation)
                    .attach_printable("not enough stock available"));
            }
        }

        let unit_price = match dto.kind {
            PurchaseKind::Buy => *book.price_buy(),
            PurchaseKind::Rent => *book.price_rent(),
        };
        let item = CartItem::new(
            CartItemId::new(Uuid::new_v4()),
            book_id,
            book.title().as_ref().clone(),
            book.author().clone(),
            book.image_url().clone(),
            dto.kind,
            quantity,
            rent_weeks,
            *book.security_deposit(),
            unit_price,
        );
        let provisional = item.id().clone();
        let user_id = self.store_state().user().map(|user| user.id().clone());
        let rollback = self.store_state_mut().push_cart_item(item.clone());

        let Some(user_id) = user_id else {
            return Ok(CartItemDto::from(item));
        };
        let mut con = match self.database_connection().acquire().await {
            Ok(con) => con,
            Err(report) => {
                rollback.apply(self.store_state_mut());
                return Err(report);
            }
        };
        match self.cart_modifier().insert(&mut con, &user_id, &item).await {
            Ok(issued) => {
                self.store_state_mut()
                    .adopt_cart_item_id(&provisional, issued.clone());
                Ok(CartItemDto::from(item.with_id(issued)))
            }
            Err(report) => {
                rollback.apply(self.store_state_mut());
                Err(report)
            }
        }
    }

    /// The local removal always stands; a failed remote delete is logged and
    /// reconciled by the next wholesale reload.
    async fn remove_from_cart(
        &mut self,
        dto: RemoveCartItemDto,
    ) -> error_stack::Result<(), KernelError> {
        let id = CartItemId::new(dto.id);
        if self.store_state_mut().remove_cart_item(&id).is_none() {
            return Ok(());
        }
        if self.store_state().user().is_none() {
            return Ok(());
        }
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self.cart_modifier().delete(&mut con, &id).await {
                    tracing::warn!("cart line delete failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for cart delete failed: {report:?}"),
        }
        Ok(())
    }

    async fn change_quantity(
        &mut self,
        dto: ChangeQuantityDto,
    ) -> error_stack::Result<CartItemDto, KernelError> {
        let id = CartItemId::new(dto.id);
        let quantity = Quantity::new(dto.quantity)?;
        let item = self
            .store_state()
            .cart_item(&id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("no such cart line")
            })?
            .clone();
        if *item.kind() == PurchaseKind::Buy {
            if let Some(book) = self.store_state().book(item.book_id()) {
                let reserved: i32 = self
                    .store_state()
                    .cart()
                    .iter()
                    .filter(|line| {
                        line.id() != &id
                            && line.book_id() == item.book_id()
                            && *line.kind() == PurchaseKind::Buy
                    })
                    .map(|line| line.quantity().count())
                    .sum();
                if !book.stock().covers(reserved + quantity.count()) {
                    return Err(Report::new(KernelError::Validation)
                        .attach_printable("not enough stock available"));
                }
            }
        }
        let updated = item.with_quantity(quantity);
        let _ = self.store_state_mut().replace_cart_item(updated.clone());
        self.push_pricing(&updated).await;
        Ok(CartItemDto::from(updated))
    }

    async fn change_rent_weeks(
        &mut self,
        dto: ChangeRentWeeksDto,
    ) -> error_stack::Result<CartItemDto, KernelError> {
        let id = CartItemId::new(dto.id);
        let weeks = RentWeeks::new(dto.weeks)?;
        let item = self
            .store_state()
            .cart_item(&id)
            .ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("no such cart line")
            })?
            .clone();
        let updated = item.with_rent_weeks(weeks)?;
        let _ = self.store_state_mut().replace_cart_item(updated.clone());
        self.push_pricing(&updated).await;
        Ok(CartItemDto::from(updated))
    }

    /// Pushes an already-recomputed line. The local copy is authoritative;
    /// a failed push is logged, not rolled back.
    async fn push_pricing(&self, item: &CartItem) {
        if self.store_state().user().is_none() {
            return;
        }
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self.cart_modifier().update_pricing(&mut con, item).await {
                    tracing::warn!("cart pricing update failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for pricing update failed: {report:?}"),
        }
    }

    /// Wholesale replacement from the store; no per-line merging.
    async fn reload_cart(&mut self) -> error_stack::Result<Vec<CartItemDto>, KernelError> {
        let Some(user_id) = self.store_state().user().map(|user| user.id().clone()) else {
            return Ok(self
                .store_state()
                .cart()
                .iter()
                .cloned()
                .map(CartItemDto::from)
                .collect());
        };
        let mut con = self.database_connection().acquire().await?;
        let cart = self.cart_query().find_by_user(&mut con, &user_id).await?;
        self.store_state_mut().replace_cart(cart.clone());
        Ok(cart.into_iter().map(CartItemDto::from).collect())
    }
}

impl<Connection: Send, T> CartService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnCartQuery<Connection>
        + DependOnCartModifier<Connection>
        + DependOnStoreState
{
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::PurchaseKind;

    use crate::service::mock::{sample_book, signed_in, MockApp};
    use crate::service::CartService;
    use crate::transfer::{
        AddToCartDto, CartItemDto, ChangeQuantityDto, ChangeRentWeeksDto, RemoveCartItemDto,
    };

    #[tokio::test]
    async fn buy_line_is_priced_and_adopts_the_issued_identity() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        let dto = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Buy,
                quantity: 2,
                rent_weeks: None,
            })
            .await
            .unwrap();
        assert_eq!(dto.price, 700);

        let stored = app.carts.stored_lines();
        assert_eq!(stored.len(), 1);
        // the state holds the identity issued by the store, not the
        // provisional one
        assert_eq!(app.state().cart()[0].id(), stored[0].1.id());
    }

    #[tokio::test]
    async fn rent_line_prices_weeks_and_deposit() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(1, 350, 50, Some(100));
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        let dto = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Rent,
                quantity: 2,
                rent_weeks: Some(3),
            })
            .await
            .unwrap();
        // (50 * 3 + 100) * 2
        assert_eq!(dto.price, 500);
    }

    #[tokio::test]
    async fn buying_past_the_stock_ceiling_is_rejected() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(3, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        app.add_to_cart(AddToCartDto {
            book_id,
            kind: PurchaseKind::Buy,
            quantity: 2,
            rent_weeks: None,
        })
        .await
        .unwrap();
        let result = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Buy,
                quantity: 2,
                rent_weeks: None,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(app.state().cart().len(), 1);
    }

    #[tokio::test]
    async fn failed_insert_rolls_the_line_back_out() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);
        app.carts.fail_insert();

        let result = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Buy,
                quantity: 1,
                rent_weeks: None,
            })
            .await;
        assert!(result.is_err());
        assert!(app.state().cart().is_empty());
    }

    #[tokio::test]
    async fn guest_cart_never_touches_the_store() {
        let mut app = MockApp::new();
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        app.add_to_cart(AddToCartDto {
            book_id,
            kind: PurchaseKind::Buy,
            quantity: 1,
            rent_weeks: None,
        })
        .await
        .unwrap();
        assert_eq!(app.state().cart().len(), 1);
        assert!(app.carts.stored_lines().is_empty());
    }

    #[tokio::test]
    async fn local_removal_stands_when_the_remote_delete_fails() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        let dto = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Buy,
                quantity: 1,
                rent_weeks: None,
            })
            .await
            .unwrap();
        app.carts.fail_delete();
        app.remove_from_cart(RemoveCartItemDto { id: dto.id })
            .await
            .unwrap();
        assert!(app.state().cart().is_empty());
    }

    #[tokio::test]
    async fn quantity_change_recomputes_and_duration_change_rejects_buys() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        let line = app
            .add_to_cart(AddToCartDto {
                book_id,
                kind: PurchaseKind::Buy,
                quantity: 1,
                rent_weeks: None,
            })
            .await
            .unwrap();
        let updated = app
            .change_quantity(ChangeQuantityDto {
                id: line.id,
                quantity: 3,
            })
            .await
            .unwrap();
        assert_eq!(updated.price, 1050);
        assert!(app
            .change_rent_weeks(ChangeRentWeeksDto {
                id: line.id,
                weeks: 2,
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn reload_replaces_the_cart_wholesale() {
        let mut app = MockApp::new();
        let user = signed_in(&mut app);
        let book = sample_book(5, 350, 50, None);
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        app.add_to_cart(AddToCartDto {
            book_id,
            kind: PurchaseKind::Buy,
            quantity: 1,
            rent_weeks: None,
        })
        .await
        .unwrap();
        // simulate a divergent local copy
        app.state_mut().clear_cart();
        let cart = app.reload_cart().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(app.state().cart().len(), 1);
        let lines = app.carts.stored_lines();
        assert_eq!(user.id(), &lines[0].0);
    }

    #[tokio::test]
    async fn repeated_reloads_yield_identical_carts() {
        let mut app = MockApp::new();
        signed_in(&mut app);
        let book = sample_book(5, 350, 50, Some(100));
        let book_id = *book.id().as_ref();
        app.seed_books(vec![book]);

        app.add_to_cart(AddToCartDto {
            book_id,
            kind: PurchaseKind::Buy,
            quantity: 2,
            rent_weeks: None,
        })
        .await
        .unwrap();
        app.add_to_cart(AddToCartDto {
            book_id,
            kind: PurchaseKind::Rent,
            quantity: 1,
            rent_weeks: Some(2),
        })
        .await
        .unwrap();

        fn shape(cart: &[CartItemDto]) -> Vec<(uuid::Uuid, i32, i64)> {
            cart.iter()
                .map(|item| (item.id, item.quantity, item.price))
                .collect()
        }
        let first = app.reload_cart().await.unwrap();
        let second = app.reload_cart().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(shape(&first), shape(&second));
    }
}
