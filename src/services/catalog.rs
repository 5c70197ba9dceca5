//! Standard pillar catalog.
//!
//! Wires the shipped collectors and calculators into the four standard
//! pillars. The GitHub activity calculator joins `student_engagement` only
//! when a GitHub client is supplied.

use std::sync::Arc;

use super::calculators::{
    CourseDeliveryCalculator, EventParticipationCalculator, FeedbackCalculator,
    GitHubActivityCalculator, InternshipPerformanceCalculator, InternshipPlacementCalculator,
    LecturerDevelopmentCalculator, ProjectDeploymentCalculator, ProjectQualityCalculator,
    RecordSource, Scoring,
};
use super::collectors::{DatabaseCollector, Dataset, GitHubActivityCollector};
use super::pillar_aggregator::PillarAggregator;
use crate::adapters::github::GitHubClient;
use crate::domain::models::pillar::names;
use crate::domain::models::EngineConfig;
use crate::domain::ports::AcademicDataSource;

/// Build the standard pillars in their fixed order.
pub fn standard_pillars(
    engine: &EngineConfig,
    data_source: Arc<dyn AcademicDataSource>,
    github: Option<GitHubClient>,
) -> Vec<Arc<PillarAggregator>> {
    let engine = Arc::new(engine.clone());
    let timeout = engine.collector_timeout();
    let db = |dataset: Dataset| {
        RecordSource::new(
            Arc::new(DatabaseCollector::new(dataset, Arc::clone(&data_source))),
            timeout,
        )
    };
    let scoring = |pillar: &str| Scoring::for_pillar(Arc::clone(&engine), pillar);

    let academic_quality = PillarAggregator::new(names::ACADEMIC_QUALITY)
        .with(Box::new(FeedbackCalculator::new(
            db(Dataset::Feedback),
            scoring(names::ACADEMIC_QUALITY),
        )))
        .with(Box::new(CourseDeliveryCalculator::new(
            db(Dataset::Courses),
            scoring(names::ACADEMIC_QUALITY),
        )));

    let teaching_capacity = PillarAggregator::new(names::TEACHING_CAPACITY).with(Box::new(
        LecturerDevelopmentCalculator::new(
            db(Dataset::Lecturers),
            scoring(names::TEACHING_CAPACITY),
        ),
    ));

    let employability = PillarAggregator::new(names::EMPLOYABILITY)
        .with(Box::new(InternshipPlacementCalculator::new(
            db(Dataset::Students),
            db(Dataset::Internships),
            scoring(names::EMPLOYABILITY),
        )))
        .with(Box::new(InternshipPerformanceCalculator::new(
            db(Dataset::Internships),
            scoring(names::EMPLOYABILITY),
        )))
        .with(Box::new(ProjectDeploymentCalculator::new(
            db(Dataset::Projects),
            scoring(names::EMPLOYABILITY),
        )))
        .with(Box::new(ProjectQualityCalculator::new(
            db(Dataset::Projects),
            scoring(names::EMPLOYABILITY),
        )));

    let mut student_engagement = PillarAggregator::new(names::STUDENT_ENGAGEMENT).with(Box::new(
        EventParticipationCalculator::new(
            db(Dataset::Students),
            db(Dataset::EventParticipation),
            scoring(names::STUDENT_ENGAGEMENT),
        ),
    ));
    if let Some(client) = github {
        let collector = GitHubActivityCollector::new(Arc::clone(&data_source), client);
        student_engagement.register(Box::new(GitHubActivityCalculator::new(
            RecordSource::new(Arc::new(collector), timeout),
            scoring(names::STUDENT_ENGAGEMENT),
        )));
    }

    vec![
        Arc::new(academic_quality),
        Arc::new(teaching_capacity),
        Arc::new(employability),
        Arc::new(student_engagement),
    ]
}
