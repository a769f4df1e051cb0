//! Route handlers.
//!
//! Each handler decodes a transient graph, runs one service call under the
//! store lock and returns the persisted or reconstituted entity.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use relmap_core::{
    core_version, Assoc, Device, EntityId, LibStudent, LibStudentService, Library, Owner,
    OwnerService, Person, PersonService, RepoError, Student, StudentService,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

type Shared = State<Arc<AppState>>;

/// Body of `PUT /owner/:id/laptops`. A missing or `null` field leaves the
/// stored laptops untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaptopsUpdate {
    #[serde(default)]
    pub laptops: Option<Vec<Device>>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}

pub async fn add_student(
    State(state): Shared,
    Json(student): Json<Student>,
) -> Result<Json<Student>, ApiError> {
    let saved =
        state.with_store(|store| StudentService::new(store).save_student_with_laptop(student))?;
    Ok(Json(saved))
}

pub async fn get_all_students(State(state): Shared) -> Result<Json<Vec<Student>>, ApiError> {
    let students = state.with_store(|store| StudentService::new(store).get_all_students())?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): Shared,
    Path(id): Path<EntityId>,
) -> Result<Json<Student>, ApiError> {
    let student = state.with_store(|store| StudentService::new(store).get_student_by_id(id))?;
    found("student", id, student)
}

pub async fn add_person(
    State(state): Shared,
    Json(person): Json<Person>,
) -> Result<Json<Person>, ApiError> {
    let saved = state.with_store(|store| PersonService::new(store).save_person(person))?;
    Ok(Json(saved))
}

pub async fn get_person(
    State(state): Shared,
    Path(id): Path<EntityId>,
) -> Result<Json<Person>, ApiError> {
    let person = state.with_store(|store| PersonService::new(store).get_person_by_id(id))?;
    found("person", id, person)
}

pub async fn add_owner(
    State(state): Shared,
    Json(owner): Json<Owner>,
) -> Result<Json<Owner>, ApiError> {
    let saved = state.with_store(|store| OwnerService::new(store).add_owner(owner))?;
    Ok(Json(saved))
}

pub async fn get_owner(
    State(state): Shared,
    Path(id): Path<EntityId>,
) -> Result<Json<Owner>, ApiError> {
    let owner = state.with_store(|store| OwnerService::new(store).get_owner_by_id(id))?;
    found("owner", id, owner)
}

pub async fn update_owner_laptops(
    State(state): Shared,
    Path(id): Path<EntityId>,
    Json(update): Json<LaptopsUpdate>,
) -> Result<Json<Owner>, ApiError> {
    let laptops = Assoc::from(update.laptops);
    let owner = state.with_store(|store| OwnerService::new(store).update_laptops(id, laptops))?;
    Ok(Json(owner))
}

pub async fn add_lib_student(
    State(state): Shared,
    Json(student): Json<LibStudent>,
) -> Result<Json<LibStudent>, ApiError> {
    let saved = state.with_store(|store| LibStudentService::new(store).add_student(student))?;
    Ok(Json(saved))
}

pub async fn get_lib_student(
    State(state): Shared,
    Path(id): Path<EntityId>,
) -> Result<Json<LibStudent>, ApiError> {
    let student = state.with_store(|store| LibStudentService::new(store).get_student_by_id(id))?;
    found("lib_student", id, student)
}

pub async fn get_library(
    State(state): Shared,
    Path(id): Path<EntityId>,
) -> Result<Json<Library>, ApiError> {
    let library = state.with_store(|store| LibStudentService::new(store).get_library_by_id(id))?;
    found("library", id, library)
}

fn found<T>(entity: &'static str, id: EntityId, value: Option<T>) -> Result<Json<T>, ApiError> {
    value
        .map(Json)
        .ok_or(ApiError::Repo(RepoError::NotFound { entity, id }))
}
