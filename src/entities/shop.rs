use uuid::Uuid;

impl_record!(
    /// A retail shop that owes payments; `region` is an [`Area`](super::Area) id
    Shop, "shop", "shops",
    display: name,
    indexed: ["name", "region"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String => "name",

        #[serde(default)]
        address: String => "address",

        region: Uuid => "region",
    }
);

impl Shop {
    pub fn new(name: impl Into<String>, address: impl Into<String>, region: Uuid) -> Self {
        let (id, created_at, updated_at) = Self::identity();
        Self {
            id,
            name: name.into(),
            address: address.into(),
            region,
            created_at,
            updated_at,
        }
    }
}
