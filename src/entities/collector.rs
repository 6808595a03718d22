impl_record!(
    /// A field agent who collects payments from shops
    Collector, "collector", "collectors",
    display: name,
    indexed: ["name", "phone"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String => "name",

        #[validate(custom(function = "crate::core::field::validate_phone"))]
        phone: String => "phone",

        #[validate(email(message = "must be a valid email address"))]
        email: String => "email",
    }
);

impl Collector {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let (id, created_at, updated_at) = Self::identity();
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            created_at,
            updated_at,
        }
    }
}
