use thiserror::Error;

/// Input fields of the add/edit transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Label,
    Amount,
    Date,
    Description,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[Self::Label, Self::Amount, Self::Date, Self::Description]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "Label",
            Self::Amount => "Amount",
            Self::Date => "Date (DD/MM/YYYY)",
            Self::Description => "Description",
        }
    }
}

/// A user-correctable problem with one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("label required")]
    LabelRequired,

    #[error("amount invalid")]
    AmountInvalid,

    #[error("date invalid")]
    DateInvalid,
}

impl ValidationError {
    pub(crate) fn field(&self) -> FormField {
        match self {
            Self::LabelRequired => FormField::Label,
            Self::AmountInvalid => FormField::Amount,
            Self::DateInvalid => FormField::Date,
        }
    }
}

/// Errors raised by the persistence gateway.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    /// The record was removed (or never existed) when an update or delete ran.
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// A stored value could not be read back into a transaction.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The background worker thread has stopped.
    #[error("storage worker is not running")]
    WorkerGone,
}

impl StoreError {
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
