pub mod cards;
pub mod folders;
pub mod users;

use crate::error::CoreError;
use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

// Extractor rejections become `InvalidInput` so every 4xx carries the same JSON body.

pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, CoreError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| CoreError::InvalidInput(e.body_text()))
}

pub(crate) fn path_params<T>(params: Result<Path<T>, PathRejection>) -> Result<T, CoreError> {
    params
        .map(|Path(inner)| inner)
        .map_err(|e| CoreError::InvalidInput(e.body_text()))
}

pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, CoreError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|e| CoreError::InvalidInput(e.body_text()))
}
