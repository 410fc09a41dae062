pub mod form;
pub mod user;

pub use form::{Form, FormInput, FormPage, ListQuery, Pagination, Question};
pub use user::{Credentials, User, UserSummary};
