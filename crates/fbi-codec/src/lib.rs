//! Blueprint string codec.
//!
//! [`decode`] turns an exported blueprint string into its JSON schema,
//! [`flatten`] walks books into a flat list, and
//! [`BlueprintData::to_blueprint`](schema::BlueprintData::to_blueprint)
//! produces the analyzer's layout snapshot.

pub mod book;
pub mod codec;
pub mod convert;
pub mod schema;

pub use book::{LabeledBlueprint, flatten};
pub use codec::{DecodeError, EncodeError, decode, encode};
pub use schema::BlueprintString;
