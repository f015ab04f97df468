//! Person handlers
//!
//! CRUD over person records with cross-entity validation against departments
//! and asynchronous search-index synchronization. Store mutations commit
//! before the matching index operation is queued; reads never touch the
//! index.

use axum::{
    extract::{Host, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rand::Rng;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;

use crate::entity::{department, person};
use crate::error::{AppError, AppResult, OptionExt};
use crate::handlers::{content_location, db_err};
use crate::search::IndexOp;
use crate::state::AppState;

/// Number of persons to fetch when no limit is given
pub const MAX_PERSONS_LIMIT: u64 = 200;

/// Person create/update request body
#[derive(Debug, Default, Deserialize)]
pub struct PersonPayload {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "DeptID", default)]
    pub dept_id: i64,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "ImagePath", default)]
    pub image_path: String,
    #[serde(rename = "Role", default)]
    pub role: String,
    #[serde(rename = "Info", default)]
    pub info: String,
}

fn validate(payload: &PersonPayload) -> AppResult<()> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("person must have a name".to_string()));
    }
    if payload.dept_id == 0 {
        return Err(AppError::Validation(
            "person must belong to a department".to_string(),
        ));
    }
    Ok(())
}

/// The department a person references must exist. Enforced here on every
/// create and update; the store carries no foreign-key constraint.
async fn ensure_department_exists(db: &DatabaseConnection, dept_id: i64) -> AppResult<()> {
    department::Entity::find_by_id(dept_id)
        .one(db)
        .await
        .map_err(|e| db_err("ensure_department_exists", e))?
        .ok_or_not_found("department does not exist")?;
    Ok(())
}

/// GET /api/person/:id
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<person::Model>> {
    let p = person::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| db_err("get_person", e))?
        .ok_or_not_found("person not found")?;

    Ok(Json(p))
}

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub order: Option<String>,
}

/// GET /api/person?offset=&limit=&order=
///
/// `order=random` shuffles the fetched page only, not the full table.
pub async fn list_persons(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<person::Model>>> {
    let mut persons = person::Entity::find()
        .order_by_desc(person::Column::Id)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(MAX_PERSONS_LIMIT))
        .all(&state.db)
        .await
        .map_err(|e| db_err("list_persons", e))?;

    if params.order.as_deref() == Some("random") {
        shuffle_persons(&mut persons);
    }

    Ok(Json(persons))
}

/// Reorder a slice of persons uniformly at random (Fisher-Yates)
fn shuffle_persons(persons: &mut [person::Model]) {
    let mut rng = rand::thread_rng();
    for i in 1..persons.len() {
        let r = rng.gen_range(0..=i);
        if i != r {
            persons.swap(i, r);
        }
    }
}

/// POST /api/person
///
/// The response returns as soon as the insert commits; the index operation is
/// queued fire-and-forget, so a search issued immediately afterwards may not
/// yet see the new person.
pub async fn create_person(
    State(state): State<AppState>,
    Host(host): Host,
    Json(payload): Json<PersonPayload>,
) -> AppResult<(StatusCode, HeaderMap, Json<person::Model>)> {
    validate(&payload)?;
    ensure_department_exists(&state.db, payload.dept_id).await?;

    let p = person::ActiveModel {
        name: Set(payload.name),
        dept_id: Set(payload.dept_id),
        email: Set(payload.email),
        phone: Set(payload.phone),
        image_path: Set(payload.image_path),
        role: Set(payload.role),
        info: Set(payload.info),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| db_err("create_person", e))?;

    state.index_writer.submit(IndexOp::Index {
        text: p.index_text(),
        id: p.id,
    });

    tracing::info!(
        "person created: id={} name={} dept={}",
        p.id,
        p.name,
        p.dept_id
    );

    let headers = content_location(&state.config.scheme, &host, "person", p.id);
    Ok((StatusCode::CREATED, headers, Json(p)))
}

/// PUT /api/person/:id
///
/// The previous record is read before the overwrite so its exact index text
/// can be unindexed. Unindex-old is queued before index-new; the shared
/// ordered queue keeps that order, so a concurrent search never loses the
/// person longer than necessary, though the old terms may briefly still
/// resolve.
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PersonPayload>,
) -> AppResult<Json<person::Model>> {
    validate(&payload)?;

    let old = person::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| db_err("update_person", e))?
        .ok_or_not_found("person not found")?;

    ensure_department_exists(&state.db, payload.dept_id).await?;

    let updated = person::ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        dept_id: Set(payload.dept_id),
        email: Set(payload.email),
        phone: Set(payload.phone),
        image_path: Set(payload.image_path),
        role: Set(payload.role),
        info: Set(payload.info),
        updated_at: Set(chrono::Utc::now()),
    }
    .update(&state.db)
    .await
    .map_err(|e| db_err("update_person", e))?;

    state.index_writer.submit(IndexOp::Unindex {
        text: old.index_text(),
        id,
    });
    state.index_writer.submit(IndexOp::Index {
        text: updated.index_text(),
        id,
    });

    tracing::info!(
        "person updated: id={} name={} dept={}",
        id,
        updated.name,
        updated.dept_id
    );

    Ok(Json(updated))
}

/// DELETE /api/person/:id
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let old = person::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| db_err("delete_person", e))?
        .ok_or_not_found("person not found")?;

    let res = person::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(|e| db_err("delete_person", e))?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("person does not exist".to_string()));
    }

    state.index_writer.submit(IndexOp::Unindex {
        text: old.index_text(),
        id,
    });

    tracing::info!("person deleted: id={}", id);

    Ok(StatusCode::NO_CONTENT)
}
