//! SQLite Store
//!
//! Relational implementation of the repository contracts. Role sets are kept
//! in join tables (`user_roles`, `member_roles`) and resolved by role name on
//! write, so callers may pass roles that were never persisted under that
//! value as long as a role with the same name exists.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::member::{Member, MemberRepository};
use crate::role::{Role, RoleRepository};
use crate::user::{User, UserRepository};
use crate::shared::error::{PlatformError, Result};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_roles (
        user_id INTEGER NOT NULL REFERENCES users(id),
        role_id INTEGER NOT NULL REFERENCES roles(id),
        PRIMARY KEY (user_id, role_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS members (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS member_roles (
        member_id INTEGER NOT NULL REFERENCES members(id),
        role_id INTEGER NOT NULL REFERENCES roles(id),
        PRIMARY KEY (member_id, role_id)
    )
    "#,
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database. A single connection that is never recycled,
    /// since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("SQLite schema initialized");
        Ok(())
    }

    async fn count_table(&self, table: &str) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&query).fetch_one(&self.pool).await?;
        Ok(count as u64)
    }
}

fn parse_role(row: &SqliteRow) -> Result<Role> {
    Ok(Role {
        id: Some(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

async fn role_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Role>> {
    let row = sqlx::query("SELECT id, name, description FROM roles WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(parse_role).transpose()
}

/// Look up the stored row for every role, by name.
async fn resolve_roles(conn: &mut SqliteConnection, roles: &HashSet<Role>) -> Result<HashSet<Role>> {
    let mut resolved = HashSet::with_capacity(roles.len());
    for role in roles {
        let stored = role_by_name(&mut *conn, &role.name)
            .await?
            .ok_or_else(|| PlatformError::not_found("Role", role.name.clone()))?;
        resolved.insert(stored);
    }
    Ok(resolved)
}

/// Roles linked to `owner_id` through `join_table`.
async fn linked_roles(
    conn: &mut SqliteConnection,
    join_table: &str,
    owner_column: &str,
    owner_id: i64,
) -> Result<HashSet<Role>> {
    let query = format!(
        "SELECT r.id, r.name, r.description FROM roles r \
         JOIN {} j ON j.role_id = r.id WHERE j.{} = ?",
        join_table, owner_column
    );
    let rows = sqlx::query(&query).bind(owner_id).fetch_all(&mut *conn).await?;
    rows.iter().map(parse_role).collect()
}

async fn link_roles(
    conn: &mut SqliteConnection,
    join_table: &str,
    owner_column: &str,
    owner_id: i64,
    roles: &HashSet<Role>,
) -> Result<()> {
    let query = format!("INSERT INTO {} ({}, role_id) VALUES (?, ?)", join_table, owner_column);
    for role in roles {
        let role_id = role
            .id
            .ok_or_else(|| PlatformError::internal(format!("Role {} has no id", role.name)))?;
        sqlx::query(&query)
            .bind(owner_id)
            .bind(role_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl RoleRepository for SqliteStore {
    async fn count(&self) -> Result<u64> {
        self.count_table("roles").await
    }

    async fn save(&self, role: Role) -> Result<Role> {
        let result = sqlx::query("INSERT INTO roles (name, description) VALUES (?, ?)")
            .bind(&role.name)
            .bind(&role.description)
            .execute(&self.pool)
            .await
            .map_err(|e| PlatformError::from_insert(e, "Role", "name", &role.name))?;

        let id = result.last_insert_rowid();
        debug!(role_id = id, name = %role.name, "Stored role");
        Ok(role.with_id(id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        let mut conn = self.pool.acquire().await?;
        role_by_name(&mut conn, name).await
    }

    async fn find_all(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query("SELECT id, name, description FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(parse_role).collect()
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn count(&self) -> Result<u64> {
        self.count_table("users").await
    }

    async fn save(&self, mut user: User) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO users (username, password, email) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlatformError::from_insert(e, "User", "username", &user.username))?;
        let id = result.last_insert_rowid();

        user.roles = resolve_roles(&mut tx, &user.roles).await?;
        link_roles(&mut tx, "user_roles", "user_id", id, &user.roles).await?;
        tx.commit().await?;

        user.id = Some(id);
        debug!(user_id = id, username = %user.username, "Stored user");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.pool.acquire().await?;

        let Some(row) = sqlx::query("SELECT id, username, password, email FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let id: i64 = row.try_get("id")?;
        let roles = linked_roles(&mut conn, "user_roles", "user_id", id).await?;

        Ok(Some(User {
            id: Some(id),
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            email: row.try_get("email")?,
            roles,
        }))
    }
}

impl SqliteStore {
    async fn load_member(&self, conn: &mut SqliteConnection, row: &SqliteRow) -> Result<Member> {
        let id: i64 = row.try_get("id")?;
        let roles = linked_roles(conn, "member_roles", "member_id", id).await?;
        Ok(Member {
            id: Some(id),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            roles,
        })
    }
}

#[async_trait]
impl MemberRepository for SqliteStore {
    async fn count(&self) -> Result<u64> {
        self.count_table("members").await
    }

    async fn save(&self, mut member: Member) -> Result<Member> {
        let mut tx = self.pool.begin().await?;
        member.roles = resolve_roles(&mut tx, &member.roles).await?;

        let id = match member.id {
            Some(id) => {
                let updated = sqlx::query("UPDATE members SET name = ?, email = ? WHERE id = ?")
                    .bind(&member.name)
                    .bind(&member.email)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                if updated.rows_affected() == 0 {
                    return Err(PlatformError::not_found("Member", id.to_string()));
                }
                sqlx::query("DELETE FROM member_roles WHERE member_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                id
            }
            None => sqlx::query("INSERT INTO members (name, email) VALUES (?, ?)")
                .bind(&member.name)
                .bind(&member.email)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid(),
        };

        link_roles(&mut tx, "member_roles", "member_id", id, &member.roles).await?;
        tx.commit().await?;

        member.id = Some(id);
        Ok(member)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Member>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query("SELECT id, name, email FROM members WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Some(self.load_member(&mut conn, &row).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Member>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query("SELECT id, name, email FROM members ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        let mut members = Vec::with_capacity(rows.len());
        for row in &rows {
            members.push(self.load_member(&mut conn, row).await?);
        }
        Ok(members)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM member_roles WHERE member_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }
}
