//! SQL schema for the materials table.
//!
//! Executed at startup via [`PgStore::ensure_schema`](crate::PgStore);
//! every statement is idempotent so repeated startups are safe.

/// Schema DDL, run statement by statement in order.
pub const SCHEMA: &[&str] = &[
  "CREATE TABLE IF NOT EXISTS materials (
     id          BIGSERIAL PRIMARY KEY,
     cas_number  VARCHAR(50) NOT NULL UNIQUE,
     properties  JSONB NOT NULL,
     create_time TIMESTAMPTZ NOT NULL DEFAULT now(),
     update_time TIMESTAMPTZ NOT NULL DEFAULT now()
   )",
  // update_time is refreshed by the store on every row update, never by
  // application code.
  "CREATE OR REPLACE FUNCTION materials_touch_update_time() RETURNS trigger AS $$
   BEGIN
     NEW.update_time = now();
     RETURN NEW;
   END;
   $$ LANGUAGE plpgsql",
  "CREATE OR REPLACE TRIGGER materials_update_time
     BEFORE UPDATE ON materials
     FOR EACH ROW EXECUTE FUNCTION materials_touch_update_time()",
];
