//! Department handlers
//!
//! CRUD over the two-level department tree. Mutations enforce the safe
//! deletion rules (no staff, no subdepartments) and the listing always
//! returns the hierarchical order, never raw ID order.

use axum::{
    extract::{Host, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::{department, person};
use crate::error::{AppError, AppResult, OptionExt};
use crate::handlers::{content_location, db_err};
use crate::state::AppState;

/// Department create/update request body
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentPayload {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "ParentID", default)]
    pub parent_id: i64,
}

/// A nonzero parent must reference an existing root department, keeping the
/// tree at exactly two levels.
async fn ensure_root_parent(db: &DatabaseConnection, parent_id: i64) -> AppResult<()> {
    if parent_id == 0 {
        return Ok(());
    }

    let parent = department::Entity::find_by_id(parent_id)
        .one(db)
        .await
        .map_err(|e| db_err("ensure_root_parent", e))?;

    match parent {
        Some(p) if p.parent_id == 0 => Ok(()),
        _ => Err(AppError::Validation(
            "parent must be an existing top-level department".to_string(),
        )),
    }
}

/// GET /api/department/:id
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<department::Model>> {
    let dept = department::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| db_err("get_department", e))?
        .ok_or_not_found("department not found")?;

    Ok(Json(dept))
}

/// GET /api/department
///
/// Departments in hierarchical order: roots in ascending name order, each
/// immediately followed by its direct children, also in name order.
pub async fn list_departments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<department::Model>>> {
    let depts = department::Entity::find()
        .order_by_asc(department::Column::Name)
        .all(&state.db)
        .await
        .map_err(|e| db_err("list_departments", e))?;

    Ok(Json(sort_hierarchical(depts)))
}

/// Two-pass hierarchical sort: group by parent, then walk the roots in the
/// order they were fetched, emitting each root followed by its children.
/// The input must already be in ascending name order.
fn sort_hierarchical(depts: Vec<department::Model>) -> Vec<department::Model> {
    let mut by_parent: HashMap<i64, Vec<department::Model>> = HashMap::new();
    for dept in depts {
        by_parent.entry(dept.parent_id).or_default().push(dept);
    }

    let mut sorted = Vec::new();
    for root in by_parent.remove(&0).unwrap_or_default() {
        let root_id = root.id;
        sorted.push(root);
        if let Some(children) = by_parent.remove(&root_id) {
            sorted.extend(children);
        }
    }
    sorted
}

/// POST /api/department
pub async fn create_department(
    State(state): State<AppState>,
    Host(host): Host,
    Json(payload): Json<DepartmentPayload>,
) -> AppResult<(StatusCode, HeaderMap, Json<department::Model>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("department must have a name".to_string()));
    }
    ensure_root_parent(&state.db, payload.parent_id).await?;

    let dept = department::ActiveModel {
        name: Set(payload.name),
        parent_id: Set(payload.parent_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| db_err("create_department", e))?;

    tracing::info!("department created: id={} name={}", dept.id, dept.name);

    let headers = content_location(&state.config.scheme, &host, "department", dept.id);
    Ok((StatusCode::CREATED, headers, Json(dept)))
}

/// PUT /api/department/:id
///
/// Overwrites name and parent unconditionally; updating a nonexistent ID is
/// not an error, matching the public contract.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentPayload>,
) -> AppResult<Json<department::Model>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("department must have a name".to_string()));
    }
    ensure_root_parent(&state.db, payload.parent_id).await?;

    // A department with children of its own cannot move under a parent;
    // that would drag the children into a third level.
    if payload.parent_id != 0 {
        let has_subdepartments = department::Entity::find()
            .filter(department::Column::ParentId.eq(id))
            .one(&state.db)
            .await
            .map_err(|e| db_err("update_department", e))?;
        if has_subdepartments.is_some() {
            return Err(AppError::Conflict(
                "cannot move a department with subdepartments under a parent".to_string(),
            ));
        }
    }

    department::Entity::update_many()
        .col_expr(department::Column::Name, Expr::value(payload.name.clone()))
        .col_expr(department::Column::ParentId, Expr::value(payload.parent_id))
        .filter(department::Column::Id.eq(id))
        .exec(&state.db)
        .await
        .map_err(|e| db_err("update_department", e))?;

    tracing::info!("department updated: id={} name={}", id, payload.name);

    Ok(Json(department::Model {
        id,
        name: payload.name,
        parent_id: payload.parent_id,
    }))
}

/// DELETE /api/department/:id
///
/// The staff check, the subdepartment check and the delete are three separate
/// statements, not one transaction. A person inserted between the check and
/// the delete slips through; an accepted, narrow race.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let has_staff = person::Entity::find()
        .filter(person::Column::DeptId.eq(id))
        .one(&state.db)
        .await
        .map_err(|e| db_err("delete_department", e))?;
    if has_staff.is_some() {
        return Err(AppError::Conflict(
            "cannot delete department with associated staff".to_string(),
        ));
    }

    let has_subdepartments = department::Entity::find()
        .filter(department::Column::ParentId.eq(id))
        .one(&state.db)
        .await
        .map_err(|e| db_err("delete_department", e))?;
    if has_subdepartments.is_some() {
        return Err(AppError::Conflict(
            "cannot delete department with subdepartments".to_string(),
        ));
    }

    let res = department::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(|e| db_err("delete_department", e))?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("department does not exist".to_string()));
    }

    tracing::info!("department deleted: id={}", id);

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dept(id: i64, name: &str, parent_id: i64) -> department::Model {
        department::Model {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    #[test]
    fn test_sort_hierarchical_interleaves_children() {
        // already in name order, as fetched from the store
        let input = vec![
            dept(1, "mainA", 0),
            dept(2, "mainB", 0),
            dept(3, "mainC", 0),
            dept(4, "subA1", 1),
            dept(5, "subA2", 1),
            dept(6, "subB1", 2),
        ];

        let names: Vec<String> = sort_hierarchical(input).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["mainA", "subA1", "subA2", "mainB", "subB1", "mainC"]);
    }

    #[test]
    fn test_sort_hierarchical_empty() {
        assert!(sort_hierarchical(Vec::new()).is_empty());
    }

    #[test]
    fn test_sort_hierarchical_roots_only() {
        let input = vec![dept(1, "a", 0), dept(2, "b", 0)];
        let names: Vec<String> = sort_hierarchical(input).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
