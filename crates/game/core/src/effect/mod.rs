//! Declarative effect aggregation.
//!
//! The model separates "what columns exist and how they combine" (the static
//! [`EffectColumn`] vocabulary) from "which sources are active right now"
//! ([`EffectEntry`] rows gated by [`Condition`]s over an [`EffectContext`]).
//! An arbitrary number of passives, buffs, debuffs and chain effects stack
//! without bespoke combination code per feature.
mod column;
mod condition;
mod context;
mod entry;
mod result;
mod table;

pub use column::{Aggregation, EffectColumn};
pub use condition::Condition;
pub use context::{EffectContext, ModuleCategories, TriggerEvent};
pub use entry::{EffectEntry, EffectTemplate, EntryId, SourceKind};
pub use result::EffectResult;
pub use table::EffectTable;
