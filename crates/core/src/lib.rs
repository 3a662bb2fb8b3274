pub mod criteria;
pub mod record;
pub mod sanitize;

pub use criteria::{CriteriaError, DateRange, SearchCriteria};
pub use record::{ActionEvent, AuditRecord, NewRecord};
pub use sanitize::ParamSanitizer;
