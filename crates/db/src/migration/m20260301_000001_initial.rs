//! Initial database migration.
//!
//! Creates the enum types, the reference tables (bases, equipment types,
//! users) and the three ledger tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(BASES_SQL).await?;
        db.execute_unprepared(EQUIPMENT_TYPES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER TABLES
        // ============================================================
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(TRANSFERS_SQL).await?;
        db.execute_unprepared(ASSIGNMENTS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE user_role AS ENUM ('admin', 'base_commander', 'logistics_officer');

CREATE TYPE equipment_category AS ENUM (
    'weapon',
    'vehicle',
    'ammunition',
    'communication',
    'other'
);

CREATE TYPE transfer_status AS ENUM ('pending', 'in_transit', 'completed', 'cancelled');

CREATE TYPE assignment_status AS ENUM ('active', 'returned', 'expended');
";

const BASES_SQL: &str = r"
CREATE TABLE bases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    location VARCHAR(255) NOT NULL DEFAULT '',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EQUIPMENT_TYPES_SQL: &str = r"
CREATE TABLE equipment_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL UNIQUE,
    category equipment_category NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(100) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL,
    home_base_id UUID REFERENCES bases(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Only admins may exist without a home base
    CONSTRAINT chk_users_home_base CHECK (role = 'admin' OR home_base_id IS NOT NULL)
);

CREATE INDEX idx_users_username ON users(username) WHERE is_active = true;
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    base_id UUID NOT NULL REFERENCES bases(id),
    equipment_type_id UUID NOT NULL REFERENCES equipment_types(id),
    quantity INTEGER NOT NULL,
    unit_cost NUMERIC(19, 4) NOT NULL,
    total_cost NUMERIC(19, 4) NOT NULL,
    purchase_date DATE NOT NULL,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_purchases_quantity CHECK (quantity > 0),
    CONSTRAINT chk_purchases_unit_cost CHECK (unit_cost >= 0)
);

CREATE INDEX idx_purchases_base_date ON purchases(base_id, purchase_date);
CREATE INDEX idx_purchases_type ON purchases(equipment_type_id);
";

const TRANSFERS_SQL: &str = r"
CREATE TABLE transfers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    source_base_id UUID NOT NULL REFERENCES bases(id),
    destination_base_id UUID NOT NULL REFERENCES bases(id),
    equipment_type_id UUID NOT NULL REFERENCES equipment_types(id),
    quantity INTEGER NOT NULL,
    transfer_date DATE NOT NULL,
    status transfer_status NOT NULL DEFAULT 'pending',
    completed_on DATE,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_transfers_quantity CHECK (quantity > 0),
    CONSTRAINT chk_transfers_distinct_bases CHECK (source_base_id <> destination_base_id),
    CONSTRAINT chk_transfers_completed_on CHECK (
        (status = 'completed') = (completed_on IS NOT NULL)
        AND (completed_on IS NULL OR completed_on >= transfer_date)
    )
);

CREATE INDEX idx_transfers_source_date ON transfers(source_base_id, transfer_date);
CREATE INDEX idx_transfers_destination_date ON transfers(destination_base_id, transfer_date);
CREATE INDEX idx_transfers_completed ON transfers(completed_on) WHERE status = 'completed';
";

const ASSIGNMENTS_SQL: &str = r"
CREATE TABLE assignments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    base_id UUID NOT NULL REFERENCES bases(id),
    equipment_type_id UUID NOT NULL REFERENCES equipment_types(id),
    quantity INTEGER NOT NULL,
    assignee VARCHAR(255) NOT NULL,
    assignment_date DATE NOT NULL,
    status assignment_status NOT NULL DEFAULT 'active',
    expended_on DATE,
    notes TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_assignments_quantity CHECK (quantity > 0),
    CONSTRAINT chk_assignments_assignee CHECK (length(trim(assignee)) > 0),
    CONSTRAINT chk_assignments_expended_on CHECK (
        (status = 'expended') = (expended_on IS NOT NULL)
        AND (expended_on IS NULL OR expended_on >= assignment_date)
    )
);

CREATE INDEX idx_assignments_base_date ON assignments(base_id, assignment_date);
CREATE INDEX idx_assignments_base_status ON assignments(base_id, status);
CREATE INDEX idx_assignments_expended ON assignments(base_id, expended_on) WHERE status = 'expended';
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_bases_updated_at BEFORE UPDATE ON bases
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_transfers_updated_at BEFORE UPDATE ON transfers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_assignments_updated_at BEFORE UPDATE ON assignments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

-- Equipment types are immutable once a ledger row references them
CREATE OR REPLACE FUNCTION prevent_referenced_equipment_type_change()
RETURNS TRIGGER AS $$
BEGIN
    IF EXISTS (SELECT 1 FROM purchases WHERE equipment_type_id = OLD.id)
       OR EXISTS (SELECT 1 FROM transfers WHERE equipment_type_id = OLD.id)
       OR EXISTS (SELECT 1 FROM assignments WHERE equipment_type_id = OLD.id) THEN
        RAISE EXCEPTION 'equipment type % is referenced by ledger rows', OLD.id;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_equipment_types_immutable BEFORE UPDATE ON equipment_types
    FOR EACH ROW EXECUTE FUNCTION prevent_referenced_equipment_type_change();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS assignments CASCADE;
DROP TABLE IF EXISTS transfers CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS equipment_types CASCADE;
DROP TABLE IF EXISTS bases CASCADE;

DROP FUNCTION IF EXISTS prevent_referenced_equipment_type_change() CASCADE;
DROP FUNCTION IF EXISTS set_updated_at() CASCADE;

DROP TYPE IF EXISTS assignment_status;
DROP TYPE IF EXISTS transfer_status;
DROP TYPE IF EXISTS equipment_category;
DROP TYPE IF EXISTS user_role;
";
