//! Initial database migration.
//!
//! Creates the enums, tables, and indexes for the expense approval
//! workflow schema.

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
        // PART 2: ORGANIZATION STRUCTURE
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(TEAMS_SQL).await?;
        db.execute_unprepared(HIERARCHY_LEVELS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: POLICIES & APPROVAL STEPS
        // ============================================================
        db.execute_unprepared(POLICIES_SQL).await?;
        db.execute_unprepared(APPROVAL_STEPS_SQL).await?;

        // ============================================================
        // PART 4: EXPENSES & APPROVALS
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(APPROVALS_SQL).await?;

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
-- Expense lifecycle: pending -> approved (terminal)
CREATE TYPE expense_status AS ENUM (
    'pending',
    'approved'
);

-- Per-step approval status
CREATE TYPE approval_status AS ENUM (
    'pending',
    'approved'
);

-- Where a step looks for its approver
CREATE TYPE team_scope AS ENUM (
    'submitter_team',
    'org_wide'
);
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const TEAMS_SQL: &str = r"
CREATE TABLE teams (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id),
    name VARCHAR(100) NOT NULL,
    is_org_wide BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_teams_org_name UNIQUE (organization_id, name)
);

CREATE INDEX ix_teams_organization_id ON teams(organization_id);
";

const HIERARCHY_LEVELS_SQL: &str = r"
-- Lower level_number = more senior (1 = CEO)
CREATE TABLE hierarchy_levels (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id),
    level_number INTEGER NOT NULL,
    level_name VARCHAR(100) NOT NULL,

    CONSTRAINT uq_hierarchy_levels_org_level UNIQUE (organization_id, level_number),
    CONSTRAINT check_level_number CHECK (level_number BETWEEN 1 AND 10)
);

CREATE INDEX ix_hierarchy_levels_org_level ON hierarchy_levels(organization_id, level_number);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id),
    team_id UUID NOT NULL REFERENCES teams(id),
    hierarchy_level_id UUID NOT NULL REFERENCES hierarchy_levels(id),
    email VARCHAR(100) NOT NULL,
    name VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE,

    CONSTRAINT uq_users_org_email UNIQUE (organization_id, email)
);

CREATE INDEX ix_users_org_active ON users(organization_id, active);
CREATE INDEX ix_users_team_id ON users(team_id);
CREATE INDEX ix_users_hierarchy_level_id ON users(hierarchy_level_id);
";

const POLICIES_SQL: &str = r"
CREATE TABLE policies (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id),
    category VARCHAR(50) NOT NULL,
    name VARCHAR(100) NOT NULL,
    description TEXT,
    min_amount DECIMAL(12, 2) NOT NULL DEFAULT 0.00,
    max_amount DECIMAL(12, 2) NOT NULL DEFAULT 999999999.99,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Multiple ranges per category are allowed; non-overlap is a
    -- policy-authoring concern, not enforced here.
    CONSTRAINT uq_policies_org_category_min UNIQUE (organization_id, category, min_amount),
    CONSTRAINT check_amount_range CHECK (min_amount <= max_amount)
);

CREATE INDEX ix_policies_org_category ON policies(organization_id, category);
CREATE INDEX ix_policies_amount_range ON policies(organization_id, min_amount, max_amount);
";

const APPROVAL_STEPS_SQL: &str = r"
CREATE TABLE approval_steps (
    id UUID PRIMARY KEY,
    policy_id UUID NOT NULL REFERENCES policies(id),
    step_order INTEGER NOT NULL,
    required_level INTEGER NOT NULL,
    team_scope team_scope NOT NULL DEFAULT 'submitter_team',
    is_required BOOLEAN NOT NULL DEFAULT TRUE,
    description VARCHAR(255),

    CONSTRAINT uq_approval_steps_policy_order UNIQUE (policy_id, step_order),
    CONSTRAINT check_step_order CHECK (step_order > 0),
    CONSTRAINT check_required_level CHECK (required_level BETWEEN 1 AND 10)
);

CREATE INDEX ix_approval_steps_policy_order ON approval_steps(policy_id, step_order);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL REFERENCES organizations(id),
    submitter_id UUID NOT NULL REFERENCES users(id),
    policy_id UUID NOT NULL REFERENCES policies(id),
    amount DECIMAL(12, 2) NOT NULL,
    description TEXT,
    status expense_status NOT NULL DEFAULT 'pending',
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    completed_at TIMESTAMPTZ
);

CREATE INDEX ix_expenses_org_submitter_submitted ON expenses(organization_id, submitter_id, submitted_at);
CREATE INDEX ix_expenses_org_status ON expenses(organization_id, status);
";

const APPROVALS_SQL: &str = r"
CREATE TABLE approvals (
    id UUID PRIMARY KEY,
    expense_id UUID NOT NULL REFERENCES expenses(id),
    step_number INTEGER NOT NULL,
    approver_id UUID NOT NULL REFERENCES users(id),
    approver_level_id UUID NOT NULL REFERENCES hierarchy_levels(id),
    required BOOLEAN NOT NULL DEFAULT TRUE,
    status approval_status NOT NULL DEFAULT 'pending',
    approved_at TIMESTAMPTZ,
    comments TEXT,

    CONSTRAINT uq_approvals_expense_step_approver UNIQUE (expense_id, step_number, approver_id)
);

CREATE INDEX ix_approvals_approver_status ON approvals(approver_id, status);
CREATE INDEX ix_approvals_expense_step ON approvals(expense_id, step_number);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS approvals;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS approval_steps;
DROP TABLE IF EXISTS policies;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS hierarchy_levels;
DROP TABLE IF EXISTS teams;
DROP TABLE IF EXISTS organizations;
DROP TYPE IF EXISTS team_scope;
DROP TYPE IF EXISTS approval_status;
DROP TYPE IF EXISTS expense_status;
";
