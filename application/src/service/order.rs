use error_stack::Report;
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier,
    DependOnOrderModifier, DependOnUserModifier, OrderModifier, UserModifier,
};
use kernel::prelude::entity::{Order, OrderId, PurchaseKind};
use kernel::KernelError;

use crate::state::DependOnStoreState;
use crate::transfer::{OrderDto, PlaceOrderDto};

#[async_trait::async_trait]
pub trait OrderService<Connection: 'static + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnOrderModifier<Connection>
    + DependOnBookModifier<Connection>
    + DependOnCartModifier<Connection>
    + DependOnUserModifier<Connection>
    + DependOnStoreState
where
    Self::BookModifier: Clone,
{
    /// Finalization is deliberately non-atomic: once the order is accepted
    /// locally, every remote step settles independently and a failure in one
    /// never unwinds the others. Stock writes for distinct books go out
    /// concurrently.
    async fn place_order(
        &mut self,
        dto: PlaceOrderDto,
    ) -> error_stack::Result<OrderDto, KernelError> {
        let user = self.store_state().user().cloned().ok_or_else(|| {
            Report::new(KernelError::Auth).attach_printable("sign in to place an order")
        })?;
        let items = self.store_state().cart().to_vec();
        if items.is_empty() {
            return Err(Report::new(KernelError::Validation).attach_printable("your cart is empty"));
        }
        let order = Order::place(
            OrderId::new(Uuid::new_v4()),
            user.id().clone(),
            items.clone(),
            dto.payment_method,
            dto.address.into(),
        );

        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self.order_modifier().insert(&mut con, &order).await {
                    tracing::error!("order record insert failed: {report:?}");
                }
            }
            Err(report) => tracing::error!("connection for order insert failed: {report:?}"),
        }

        // Local decrement first so the catalogue reflects the purchase
        // immediately; the remote writes push the floored absolute values.
        // Rentals return their copies, so only BUY lines touch stock.
        let mut stock_writes = Vec::new();
        for item in &items {
            if *item.kind() == PurchaseKind::Rent {
                continue;
            }
            let Some(book) = self.store_state().book(item.book_id()).cloned() else {
                continue;
            };
            let book = book.decrement_stock(item.quantity().count());
            stock_writes.push((book.id().clone(), *book.stock()));
            self.store_state_mut().update_book(book);
        }
        let mut handles = Vec::new();
        for (book_id, stock) in stock_writes {
            let modifier = self.book_modifier().clone();
            match self.database_connection().acquire().await {
                Ok(mut con) => handles.push(tokio::spawn(async move {
                    modifier.update_stock(&mut con, &book_id, &stock).await
                })),
                Err(report) => tracing::warn!("connection for stock write failed: {report:?}"),
            }
        }
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(report)) => tracing::warn!("stock write failed: {report:?}"),
                Err(error) => tracing::warn!("stock write task failed: {error}"),
            }
        }

        let user = items.iter().fold(user, |user, item| match item.kind() {
            PurchaseKind::Buy => user.record_purchase(item.book_id().clone()),
            PurchaseKind::Rent => user.record_rental(item.book_id().clone()),
        });
        match self.database_connection().acquire().await {
            Ok(mut con) => {
                if let Err(report) = self.user_modifier().upsert(&mut con, &user).await {
                    tracing::warn!("profile history update failed: {report:?}");
                }
                if let Err(report) = self.cart_modifier().clear(&mut con, user.id()).await {
                    tracing::warn!("remote cart clear failed: {report:?}");
                }
            }
            Err(report) => tracing::warn!("connection for order cleanup failed: {report:?}"),
        }
        self.store_state_mut().set_user(Some(user));
        self.store_state_mut().clear_cart();

        Ok(OrderDto::from(order))
    }
}

impl<Connection: 'static + Send, T> OrderService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnOrderModifier<Connection>
        + DependOnBookModifier<Connection>
        + DependOnCartModifier<Connection>
        + DependOnUserModifier<Connection>
        + DependOnStoreState,
    T::BookModifier: Clone,
{
}
