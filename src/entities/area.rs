impl_record!(
    /// A sales region shops are grouped under
    Area, "area", "areas",
    display: name,
    indexed: ["name"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String => "name",
    }
);

impl Area {
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
