//! # zod-modelgen
//!
//! Generate TypeScript [Zod](https://zod.dev) validation schemas and
//! CRUD-operation argument schemas from a declarative data model.
//!
//! The crate is the generation core of a larger pipeline: a host process
//! parses the original schema source into a model document, hands it to
//! this crate, and writes the returned text to disk. The core itself
//! performs no file I/O and owns no command-line surface.
//!
//! One generation pass walks the entities of an ingested [`DataModel`] in
//! declaration order and emits, per entity, a coherent set of
//! cross-referencing schema definitions: the object shape, a filter
//! predicate, a unique-lookup schema, an inclusion directive,
//! create/update payloads, and the argument bundles for the five CRUD
//! operations. Mutually recursive entity schemas are broken with
//! `z.lazy(() => ...)` deferrals; enums referenced by many fields are
//! emitted once.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zod_modelgen::{DataModel, ZodGenerator};
//!
//! let model = DataModel::from_json(&document)?;
//! let code = ZodGenerator::new(&model).generate();
//! // the host collaborator writes `code` to its output location
//! ```
//!
//! ## Authoring overrides
//!
//! A field's documentation string may override its generated expression:
//!
//! - `@zod use(myCustomSchema)` passes the inner expression through
//!   literally;
//! - `@zod string().email()` (or any other dot-chain) is prefixed with the
//!   `z` namespace and normalized into canonical call-chain form.
//!
//! Documentation that does not begin with the marker has no effect.

pub mod error;
pub mod expr;
pub mod generator;
pub mod model;

pub use error::{IngestError, IngestResult};
pub use generator::{GeneratorConfig, IndentStyle, ZodGenerator};
pub use model::{DataModel, Entity, EnumDef, Field, FieldKind, UniqueGroup};
