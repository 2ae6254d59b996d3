use kernel::prelude::entity::Inquiry;

pub struct InquiryDto {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub query: String,
    pub time_slot: String,
}

impl From<InquiryDto> for Inquiry {
    fn from(value: InquiryDto) -> Self {
        Inquiry::new(
            value.full_name,
            value.email,
            value.mobile,
            value.query,
            value.time_slot,
        )
    }
}
