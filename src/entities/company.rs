impl_record!(
    /// A supplier whose invoices are collected from shops
    Company, "company", "companies",
    display: name,
    indexed: ["name"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String => "name",
    }
);

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        let (id, created_at, updated_at) = Self::identity();
        Self {
            id,
            name: name.into(),
            created_at,
            updated_at,
        }
    }
}
