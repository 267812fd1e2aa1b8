//! `SeaORM` Entity for transfers table.
//!
//! A transfer references `bases` twice, so there is no `Related<bases::Entity>`
//! impl; join through `Relation::SourceBase` or `Relation::DestinationBase`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransferStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_base_id: Uuid,
    pub destination_base_id: Uuid,
    pub equipment_type_id: Uuid,
    pub quantity: i32,
    pub transfer_date: Date,
    pub status: TransferStatus,
    pub completed_on: Option<Date>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bases::Entity",
        from = "Column::SourceBaseId",
        to = "super::bases::Column::Id"
    )]
    SourceBase,
    #[sea_orm(
        belongs_to = "super::bases::Entity",
        from = "Column::DestinationBaseId",
        to = "super::bases::Column::Id"
    )]
    DestinationBase,
    #[sea_orm(
        belongs_to = "super::equipment_types::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_types::Column::Id"
    )]
    EquipmentTypes,
}

impl Related<super::equipment_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
