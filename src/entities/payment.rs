use chrono::{DateTime, Utc};
use uuid::Uuid;

impl_record!(
    /// An invoice collected from a shop on behalf of a company
    ///
    /// `shop`, `company` and `collector` hold record ids; the populated view
    /// replaces them with the referenced records.
    Payment, "payment", "payments",
    display: invoice,
    indexed: ["shop", "company", "collector", "paymentDate"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        invoice: String => "invoice",

        shop: Uuid => "shop",

        company: Uuid => "company",

        #[validate(range(min = 0.0, message = "must not be negative"))]
        amount: f64 => "amount",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        paid_amount: f64 => "paidAmount",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        free: f64 => "free",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        discount: f64 => "discount",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        return_amount: f64 => "returnAmount",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        market_return: f64 => "marketReturn",

        #[serde(default)]
        #[validate(range(min = 0.0, message = "must not be negative"))]
        due_amount: f64 => "dueAmount",

        #[serde(default, with = "crate::core::timestamp::option")]
        payment_date: Option<DateTime<Utc>> => "paymentDate",

        #[serde(default, with = "crate::core::timestamp::option")]
        due_date: Option<DateTime<Utc>> => "dueDate",

        #[serde(default)]
        payment_status: String => "paymentStatus",

        #[serde(default)]
        payment_method: String => "paymentMethod",

        #[serde(default)]
        collector: Option<Uuid> => "collector",

        #[serde(default)]
        verified: bool => "verified",
    }
);

impl Payment {
    /// A payment with every optional amount at zero and no dates
    pub fn new(invoice: impl Into<String>, shop: Uuid, company: Uuid, amount: f64) -> Self {
        let (id, created_at, updated_at) = Self::identity();
        Self {
            id,
            invoice: invoice.into(),
            shop,
            company,
            amount,
            paid_amount: 0.0,
            free: 0.0,
            discount: 0.0,
            return_amount: 0.0,
            market_return: 0.0,
            due_amount: 0.0,
            payment_date: None,
            due_date: None,
            payment_status: String::new(),
            payment_method: String::new(),
            collector: None,
            verified: false,
            created_at,
            updated_at,
        }
    }

    pub fn paid_on(mut self, date: DateTime<Utc>) -> Self {
        self.payment_date = Some(date);
        self
    }

    pub fn collected_by(mut self, collector: Uuid) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.payment_status = status.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }
}
