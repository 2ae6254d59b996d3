use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::update::{DependOnInquiryModifier, InquiryModifier};
use kernel::prelude::entity::Inquiry;
use kernel::KernelError;

use crate::transfer::InquiryDto;

#[async_trait::async_trait]
pub trait InquiryService<Connection: Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnInquiryModifier<Connection>
{
    /// Contact-form submission; open to guests.
    async fn submit_inquiry(&self, dto: InquiryDto) -> error_stack::Result<(), KernelError> {
        let inquiry = Inquiry::from(dto);
        let mut con = self.database_connection().acquire().await?;
        self.inquiry_modifier().insert(&mut con, &inquiry).await
    }
}

impl<Connection: Send, T> InquiryService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnInquiryModifier<Connection>
{
}
