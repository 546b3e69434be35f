pub mod deck;
pub mod patch;
pub mod plan;

pub use deck::{Card, Deck, DeckRepository};
pub use patch::{CardChange, CorrectionTable, PatchOutcome, Replacement, SenseCorrection, patch};
pub use plan::{PatchPlan, PatchSet, PatchTarget};
