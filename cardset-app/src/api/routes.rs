use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cardset_core::export::{download_file_name, download_text, share_url};
use cardset_core::{FlashcardGroup, FlashcardStore, GroupDraft, Storage, ValidationErrors};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

use crate::api::dto::{ErrorOut, GroupSummary, ShareOut};

pub type SharedStore = Arc<Mutex<FlashcardStore<Box<dyn Storage>>>>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub share_origin: String,
}

pub enum ApiError {
    NotFound,
    Invalid(ValidationErrors),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorOut { error: "flashcard not found".into(), fields: vec![] }),
            )
                .into_response(),
            ApiError::Invalid(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorOut { error: "invalid flashcard".into(), fields: e.errors }),
            )
                .into_response(),
        }
    }
}

fn find(st: &AppState, id: &str) -> Result<FlashcardGroup, ApiError> {
    st.store.lock().get(id).cloned().ok_or(ApiError::NotFound)
}

pub async fn list_groups(State(st): State<Arc<AppState>>) -> Json<Vec<GroupSummary>> {
    let store = st.store.lock();
    Json(
        store
            .groups()
            .iter()
            .map(|g| GroupSummary::new(g, share_url(&st.share_origin, &g.id)))
            .collect(),
    )
}

pub async fn create_group(
    State(st): State<Arc<AppState>>,
    Json(draft): Json<GroupDraft>,
) -> Result<(StatusCode, Json<FlashcardGroup>), ApiError> {
    let new_group = draft.validate().map_err(ApiError::Invalid)?;
    let mut store = st.store.lock();
    let created = store.create(new_group).clone();
    if let Some(e) = store.last_persist_error() {
        warn!(id = %created.id, error = e, "created group is not saved");
    }
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_group(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FlashcardGroup>, ApiError> {
    find(&st, &id).map(Json)
}

pub async fn download_group(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let g = find(&st, &id)?;
    let disposition = format!("attachment; filename=\"{}\"", download_file_name(&g).replace('"', "'"));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download_text(&g),
    )
        .into_response())
}

pub async fn share_group(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ShareOut>, ApiError> {
    let g = find(&st, &id)?;
    Ok(Json(ShareOut { url: share_url(&st.share_origin, &g.id) }))
}

/// Deleting an unknown id is not an error.
pub async fn delete_group(State(st): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    st.store.lock().delete(&id);
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardset_core::MemoryStorage;

    fn state() -> Arc<AppState> {
        let storage: Box<dyn Storage> = Box::new(MemoryStorage::new());
        Arc::new(AppState {
            store: Arc::new(Mutex::new(FlashcardStore::open(storage))),
            share_origin: "http://cards.test".into(),
        })
    }

    fn draft() -> GroupDraft {
        GroupDraft::new("Capitals", "Europe").with_term("France", "Paris")
    }

    #[tokio::test]
    async fn create_get_delete() {
        let st = state();
        let (code, Json(created)) = create_group(State(st.clone()), Json(draft())).await.ok().unwrap();
        assert_eq!(code, StatusCode::CREATED);

        let Json(fetched) = get_group(State(st.clone()), Path(created.id.clone())).await.ok().unwrap();
        assert_eq!(fetched, created);

        let Json(list) = list_groups(State(st.clone())).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].share_url, format!("http://cards.test/flashcard/{}", created.id));

        assert_eq!(delete_group(State(st.clone()), Path(created.id.clone())).await, StatusCode::NO_CONTENT);
        assert_eq!(delete_group(State(st.clone()), Path(created.id.clone())).await, StatusCode::NO_CONTENT);
        let missing = get_group(State(st), Path(created.id)).await;
        assert!(matches!(missing, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn invalid_draft_is_422() {
        let st = state();
        let res = create_group(State(st.clone()), Json(GroupDraft::new("t", "d"))).await;
        let Err(err) = res else { panic!("expected validation error") };
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(st.store.lock().is_empty());
    }

    #[tokio::test]
    async fn download_sets_attachment_name() {
        let st = state();
        let (_, Json(g)) = create_group(State(st.clone()), Json(draft())).await.ok().unwrap();
        let resp = download_group(State(st), Path(g.id)).await.ok().unwrap();
        let cd = resp.headers().get(header::CONTENT_DISPOSITION).unwrap();
        assert_eq!(cd.to_str().unwrap(), "attachment; filename=\"Capitals_flashcards.txt\"");
    }
}
