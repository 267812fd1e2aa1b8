//! `SeaORM` entity definitions.

pub mod assignments;
pub mod bases;
pub mod equipment_types;
pub mod purchases;
pub mod sea_orm_active_enums;
pub mod transfers;
pub mod users;
