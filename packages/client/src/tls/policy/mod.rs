//! Certificate selection and validation policies
//!
//! Both hooks are traits with a single decision method, blanket
//! implemented for plain closures. A configuration resolves each hook to
//! either the built-in default or the caller's policy.

pub mod policy_errors;
pub mod selection;
pub mod validation;

pub use policy_errors::SslPolicyErrors;
pub use selection::{
    CertificateSelector, SelectionContext, SelectionPolicy, default_select,
    select_by_acceptable_issuer, select_first,
};
pub use validation::{
    CertificateValidator, INSECURE_DEFAULT_ACCEPT_ALL, ValidationContext, ValidationPolicy,
    default_validate, reject_on_policy_errors,
};
