use crate::entity::Inquiry;
use crate::KernelError;

#[async_trait::async_trait]
pub trait InquiryModifier<Connection: Send>: 'static + Sync + Send {
    async fn insert(
        &self,
        con: &mut Connection,
        inquiry: &Inquiry,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnInquiryModifier<Connection: Send>: 'static + Sync + Send {
    type InquiryModifier: InquiryModifier<Connection>;
    fn inquiry_modifier(&self) -> &Self::InquiryModifier;
}
