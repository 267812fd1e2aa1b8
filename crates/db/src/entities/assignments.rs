//! `SeaORM` Entity for assignments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AssignmentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub base_id: Uuid,
    pub equipment_type_id: Uuid,
    pub quantity: i32,
    pub assignee: String,
    pub assignment_date: Date,
    pub status: AssignmentStatus,
    pub expended_on: Option<Date>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bases::Entity",
        from = "Column::BaseId",
        to = "super::bases::Column::Id"
    )]
    Bases,
    #[sea_orm(
        belongs_to = "super::equipment_types::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_types::Column::Id"
    )]
    EquipmentTypes,
}

impl Related<super::bases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bases.def()
    }
}

impl Related<super::equipment_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EquipmentTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
