//! Form state for the bulk and single update flows
//!
//! Each form owns its selected input, a submit guard and a handle to the
//! merchant API. Submissions always end in a [`Dialog`].

pub mod bulk;
pub mod dialog;
pub mod guard;
pub mod single;
pub mod validation;

pub use bulk::BulkUploadForm;
pub use dialog::{Dialog, DialogKind};
pub use guard::SubmitControl;
pub use single::SingleUpdateForm;
pub use validation::{MerchantForm, ValidationErrors};
