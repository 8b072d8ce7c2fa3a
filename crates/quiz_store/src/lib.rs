mod canonical;
mod document;
mod error;
mod load;
mod schema;
mod store;

pub use canonical::{answer_from_canonical, to_canonical};
pub use error::StoreError;
pub use load::{load_session, EXPECTED_FORMAT};
pub use schema::{CanonicalAnswer, OtherTag, QuestionRecord, Scalar, YesNoLiteral};
pub use store::YamlAnswerStore;
