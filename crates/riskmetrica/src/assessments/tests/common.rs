use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::appetite::{
    AppetiteCalculator, AppetiteRequestPayload, AssessmentCategory, Context, Dimension,
};
use crate::assessments::domain::{AssessmentDocument, AssessmentId, AssessmentSummary};
use crate::assessments::repository::{
    sort_newest_first, stamp_for_save, AssessmentRepository, RepositoryError,
};
use crate::assessments::{assessment_router, AssessmentService};

pub(super) fn context() -> Context {
    Context {
        organisation: "Example Bank".to_string(),
        strategic_objective: "Grow SME lending profitably".to_string(),
        time_horizon_months: 12,
        risk_domain: "Credit Risk".to_string(),
        category: AssessmentCategory::Financial,
    }
}

pub(super) fn sme_dimensions() -> Vec<Dimension> {
    vec![
        Dimension::new("Capital Adequacy", 0.60, 0.25),
        Dimension::new("Earnings Volatility", 0.40, 0.20),
        Dimension::new("Liquidity Buffer", 0.70, 0.20),
        Dimension::new("Concentration Risk", 0.35, 0.20),
        Dimension::new("Regulatory Headroom", 0.55, 0.15),
    ]
}

pub(super) fn payload() -> AppetiteRequestPayload {
    AppetiteRequestPayload {
        context: context(),
        dimensions: sme_dimensions(),
    }
}

pub(super) fn titled_document(title: &str, category: AssessmentCategory) -> AssessmentDocument {
    let mut document = AssessmentDocument::seeded();
    document.title = title.to_string();
    document.context.category = category;
    document
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone(), AppetiteCalculator::default());
    (service, repository)
}

/// Service whose calculator reads (and stores) bands at `bands_path`.
pub(super) fn service_with_bands(bands_path: &std::path::Path) -> AssessmentService<MemoryRepository> {
    AssessmentService::new(
        Arc::new(MemoryRepository::default()),
        AppetiteCalculator::new(Some(bands_path.to_path_buf())),
    )
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) documents: Arc<Mutex<HashMap<AssessmentId, AssessmentDocument>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.documents.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn save(&self, document: AssessmentDocument) -> Result<AssessmentDocument, RepositoryError> {
        let (id, document) = stamp_for_save(document);
        let mut guard = self.documents.lock().expect("repository mutex poisoned");
        guard.insert(id, document.clone());
        Ok(document)
    }

    fn list(
        &self,
        category: Option<AssessmentCategory>,
    ) -> Result<Vec<AssessmentSummary>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        let mut summaries: Vec<AssessmentSummary> = guard
            .values()
            .filter(|document| category.map_or(true, |c| document.context.category == c))
            .filter_map(AssessmentDocument::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    fn load(&self, id: &AssessmentId) -> Result<Option<AssessmentDocument>, RepositoryError> {
        let guard = self.documents.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn save(&self, _document: AssessmentDocument) -> Result<AssessmentDocument, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(
        &self,
        _category: Option<AssessmentCategory>,
    ) -> Result<Vec<AssessmentSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn load(&self, _id: &AssessmentId) -> Result<Option<AssessmentDocument>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
