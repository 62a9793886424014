//! Demo-mode CRUD operations standing in for the real backend's calls.

use chrono::Utc;
use uuid::Uuid;

use super::{
    AcademicQueries, LocalDataStore, OutstandingAmounts, PackingCounts, PackingStatuses, Schools,
    TrainingVisits,
};
use crate::errors::AppError;
use crate::models::{
    AcademicQuery, CreateAcademicQueryRequest, CreateSchoolRequest, CreateTrainingVisitRequest,
    OutstandingAmount, PackingCount, PackingStage, PackingStatus, QueryStatus, School,
    SetPackingCountRequest, TrainingVisit, VisitStatus,
};

impl LocalDataStore {
    pub async fn list_schools(&self) -> Vec<School> {
        let mut schools: Vec<School> = self.read::<Schools>().await.into_values().collect();
        schools.sort_by(|a, b| a.name.cmp(&b.name));
        schools
    }

    /// Create a school along with its initial packing status and a zero
    /// outstanding amount.
    pub async fn create_school(&self, request: &CreateSchoolRequest) -> Result<School, AppError> {
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("School name is required".to_string()));
        }

        let _writes = self.writes.lock().await;
        let mut schools = self.load::<Schools>().await?;
        let mut statuses = self.load::<PackingStatuses>().await?;
        let mut amounts = self.load::<OutstandingAmounts>().await?;

        let now = Utc::now();
        let school = School {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            city: request.city.clone(),
            contact_person: request.contact_person.clone(),
            contact_phone: request.contact_phone.clone(),
            created_at: now,
        };

        schools.insert(school.id.clone(), school.clone());
        self.persist::<Schools>(&schools).await?;

        statuses.insert(
            school.id.clone(),
            PackingStatus {
                school_id: school.id.clone(),
                stage: PackingStage::default(),
                updated_at: now,
            },
        );
        self.persist::<PackingStatuses>(&statuses).await?;

        amounts.insert(
            school.id.clone(),
            OutstandingAmount {
                school_id: school.id.clone(),
                amount_minor: 0,
                updated_at: now,
            },
        );
        self.persist::<OutstandingAmounts>(&amounts).await?;

        tracing::debug!(school_id = %school.id, "Created demo school");
        Ok(school)
    }

    pub async fn packing_status(&self, school_id: &str) -> Option<PackingStatus> {
        self.read::<PackingStatuses>().await.remove(school_id)
    }

    pub async fn set_packing_stage(
        &self,
        school_id: &str,
        stage: PackingStage,
    ) -> Result<PackingStatus, AppError> {
        let _writes = self.writes.lock().await;
        self.require_school(school_id).await?;

        let status = PackingStatus {
            school_id: school_id.to_string(),
            stage,
            updated_at: Utc::now(),
        };
        let mut statuses = self.load::<PackingStatuses>().await?;
        statuses.insert(school_id.to_string(), status.clone());
        self.persist::<PackingStatuses>(&statuses).await?;
        Ok(status)
    }

    pub async fn outstanding_amount(&self, school_id: &str) -> Option<OutstandingAmount> {
        self.read::<OutstandingAmounts>().await.remove(school_id)
    }

    pub async fn set_outstanding(
        &self,
        school_id: &str,
        amount_minor: i64,
    ) -> Result<OutstandingAmount, AppError> {
        if amount_minor < 0 {
            return Err(AppError::Validation(
                "Outstanding amount cannot be negative".to_string(),
            ));
        }
        let _writes = self.writes.lock().await;
        self.require_school(school_id).await?;

        let amount = OutstandingAmount {
            school_id: school_id.to_string(),
            amount_minor,
            updated_at: Utc::now(),
        };
        let mut amounts = self.load::<OutstandingAmounts>().await?;
        amounts.insert(school_id.to_string(), amount.clone());
        self.persist::<OutstandingAmounts>(&amounts).await?;
        Ok(amount)
    }

    pub async fn set_packing_count(
        &self,
        request: &SetPackingCountRequest,
    ) -> Result<PackingCount, AppError> {
        if request.class_name.trim().is_empty() || request.theme.trim().is_empty() {
            return Err(AppError::Validation(
                "Class and theme are required".to_string(),
            ));
        }
        let _writes = self.writes.lock().await;
        self.require_school(&request.school_id).await?;

        let count = PackingCount {
            school_id: request.school_id.clone(),
            class_name: request.class_name.trim().to_string(),
            theme: request.theme.trim().to_string(),
            count: request.count,
        };
        let mut counts = self.load::<PackingCounts>().await?;
        counts.insert(count.key(), count.clone());
        self.persist::<PackingCounts>(&counts).await?;
        Ok(count)
    }

    pub async fn list_packing_counts(&self, school_id: &str) -> Vec<PackingCount> {
        self.read::<PackingCounts>()
            .await
            .into_values()
            .filter(|count| count.school_id == school_id)
            .collect()
    }

    pub async fn list_training_visits(&self) -> Vec<TrainingVisit> {
        let mut visits = self.read::<TrainingVisits>().await;
        visits.sort_by(|a, b| a.visit_date.cmp(&b.visit_date));
        visits
    }

    pub async fn add_training_visit(
        &self,
        request: &CreateTrainingVisitRequest,
    ) -> Result<TrainingVisit, AppError> {
        if request.trainer.trim().is_empty() {
            return Err(AppError::Validation("Trainer is required".to_string()));
        }
        let _writes = self.writes.lock().await;
        self.require_school(&request.school_id).await?;

        let visit = TrainingVisit {
            id: Uuid::new_v4().to_string(),
            school_id: request.school_id.clone(),
            trainer: request.trainer.trim().to_string(),
            visit_date: request.visit_date,
            notes: request.notes.clone(),
            status: VisitStatus::Scheduled,
        };
        let mut visits = self.load::<TrainingVisits>().await?;
        visits.push(visit.clone());
        self.persist::<TrainingVisits>(&visits).await?;
        Ok(visit)
    }

    pub async fn list_academic_queries(&self) -> Vec<AcademicQuery> {
        let mut queries = self.read::<AcademicQueries>().await;
        queries.sort_by(|a, b| b.raised_at.cmp(&a.raised_at));
        queries
    }

    pub async fn raise_academic_query(
        &self,
        request: &CreateAcademicQueryRequest,
    ) -> Result<AcademicQuery, AppError> {
        if request.subject.trim().is_empty() || request.question.trim().is_empty() {
            return Err(AppError::Validation(
                "Subject and question are required".to_string(),
            ));
        }
        let _writes = self.writes.lock().await;
        self.require_school(&request.school_id).await?;

        let query = AcademicQuery {
            id: Uuid::new_v4().to_string(),
            school_id: request.school_id.clone(),
            subject: request.subject.trim().to_string(),
            question: request.question.trim().to_string(),
            status: QueryStatus::Open,
            raised_at: Utc::now(),
            resolved_at: None,
        };
        let mut queries = self.load::<AcademicQueries>().await?;
        queries.push(query.clone());
        self.persist::<AcademicQueries>(&queries).await?;
        Ok(query)
    }

    pub async fn resolve_academic_query(&self, id: &str) -> Result<AcademicQuery, AppError> {
        let _writes = self.writes.lock().await;
        let mut queries = self.load::<AcademicQueries>().await?;
        let query = queries
            .iter_mut()
            .find(|query| query.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Academic query {} not found", id)))?;

        if query.status != QueryStatus::Resolved {
            query.status = QueryStatus::Resolved;
            query.resolved_at = Some(Utc::now());
        }
        let resolved = query.clone();
        self.persist::<AcademicQueries>(&queries).await?;
        Ok(resolved)
    }

    async fn require_school(&self, school_id: &str) -> Result<(), AppError> {
        if self.load::<Schools>().await?.contains_key(school_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("School {} not found", school_id)))
        }
    }
}
