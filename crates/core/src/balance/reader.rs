//! Read port over the asset ledger.

use async_trait::async_trait;
use garrison_shared::types::{BaseId, EquipmentTypeId};
use thiserror::Error;

use super::types::{BaseInfo, EquipmentTypeInfo, LedgerWindow, TypeMovements};

/// The ledger could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ledger read failed: {message}")]
pub struct LedgerReadError {
    message: String,
}

impl LedgerReadError {
    /// Wraps a storage failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Everything the balance engine needs from storage.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Looks up a base by ID.
    async fn find_base(&self, id: BaseId) -> Result<Option<BaseInfo>, LedgerReadError>;

    /// Lists every base, active or not, ordered by name.
    async fn list_bases(&self) -> Result<Vec<BaseInfo>, LedgerReadError>;

    /// Looks up an equipment type by ID.
    async fn find_equipment_type(
        &self,
        id: EquipmentTypeId,
    ) -> Result<Option<EquipmentTypeInfo>, LedgerReadError>;

    /// Lists every equipment type, ordered by name.
    async fn list_equipment_types(&self) -> Result<Vec<EquipmentTypeInfo>, LedgerReadError>;

    /// Sums movements for `base_id` inside `window`, one row per equipment
    /// type that has any movement.
    ///
    /// Transfers count only when completed. `assigned` covers active
    /// assignments outstanding at the end of the window.
    async fn movement_totals(
        &self,
        base_id: BaseId,
        window: LedgerWindow,
        equipment_type_id: Option<EquipmentTypeId>,
    ) -> Result<Vec<TypeMovements>, LedgerReadError>;
}
