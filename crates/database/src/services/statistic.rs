use crate::{entities::santri, error::ServiceError};
use chrono::{Days, NaiveDateTime, NaiveTime, Utc};
use models::{Gender, Status};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use serde::Serialize;

/// How far back a registration still counts as new
const NEW_REGISTRANT_DAYS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    pub male: u64,
    pub female: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyCount {
    pub college_year: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub new_registrants: u64,
    pub total_santri: u64,
    pub active_santri: u64,
    pub inactive_santri: u64,
    /// Active santri only
    pub gender_distribution: GenderDistribution,
    /// Active santri per college year, latest year first
    pub yearly_distribution: Vec<YearlyCount>,
}

pub struct StatisticService;

impl StatisticService {
    pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
        let (new_registrants, total_santri, active_santri, inactive_santri, genders, years) =
            futures::try_join!(
                santri::Entity::find()
                    .filter(santri::Column::CreatedAt.gte(Self::new_registrant_cutoff()))
                    .count(db),
                santri::Entity::find().count(db),
                santri::Entity::find()
                    .filter(santri::Column::Status.eq(Status::Active))
                    .count(db),
                santri::Entity::find()
                    .filter(santri::Column::Status.eq(Status::Inactive))
                    .count(db),
                santri::Entity::find()
                    .select_only()
                    .column(santri::Column::Gender)
                    .column_as(Expr::col(santri::Column::Id).count(), "total")
                    .filter(santri::Column::Status.eq(Status::Active))
                    .group_by(santri::Column::Gender)
                    .into_tuple::<(Option<Gender>, i64)>()
                    .all(db),
                santri::Entity::find()
                    .select_only()
                    .column(santri::Column::CollegeYear)
                    .column_as(Expr::col(santri::Column::Id).count(), "total")
                    .filter(santri::Column::Status.eq(Status::Active))
                    .filter(santri::Column::CollegeYear.is_not_null())
                    .filter(santri::Column::CollegeYear.ne(""))
                    .group_by(santri::Column::CollegeYear)
                    .order_by_desc(santri::Column::CollegeYear)
                    .into_tuple::<(String, i64)>()
                    .all(db),
            )?;

        let mut gender_distribution = GenderDistribution::default();
        for (gender, total) in genders {
            match gender {
                Some(Gender::Male) => gender_distribution.male = total as u64,
                Some(Gender::Female) => gender_distribution.female = total as u64,
                None => {}
            }
        }

        let yearly_distribution = years
            .into_iter()
            .map(|(college_year, total)| YearlyCount {
                college_year,
                total: total as u64,
            })
            .collect();

        Ok(DashboardStats {
            new_registrants,
            total_santri,
            active_santri,
            inactive_santri,
            gender_distribution,
            yearly_distribution,
        })
    }

    /// Midnight of the day `NEW_REGISTRANT_DAYS` days ago
    fn new_registrant_cutoff() -> NaiveDateTime {
        let today = Utc::now().date_naive();
        let start = today
            .checked_sub_days(Days::new(NEW_REGISTRANT_DAYS))
            .unwrap_or(today);

        start.and_time(NaiveTime::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::santri::{SantriProfile, SantriRecord, SantriService},
        test_util::TestDb,
    };
    use models::Role;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set};

    async fn add(
        db: &DatabaseConnection,
        code: &str,
        gender: Gender,
        status: Status,
        college_year: Option<&str>,
    ) {
        let record = SantriRecord {
            code: Some(code.to_string()),
            fullname: code.to_string(),
            nickname: None,
            gender: Some(gender),
            role: Role::Santri,
            status,
            profile: SantriProfile {
                college_year: college_year.map(str::to_string),
                ..Default::default()
            },
        };
        SantriService::upsert_by_code(db, record).await.unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let db = TestDb::new().await;
        add(&db.conn, "A01", Gender::Male, Status::Active, Some("2023")).await;
        add(&db.conn, "A02", Gender::Male, Status::Active, Some("2024")).await;
        add(&db.conn, "A03", Gender::Female, Status::Active, Some("2024")).await;
        add(&db.conn, "A04", Gender::Female, Status::Active, Some("")).await;
        add(&db.conn, "A05", Gender::Female, Status::Inactive, Some("2024")).await;

        // Registered long ago
        let old = SantriService::get_by_code(&db.conn, "A05").await.unwrap();
        let mut old: santri::ActiveModel = old.into();
        old.created_at = Set(
            NaiveDateTime::parse_from_str("2020-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
        );
        old.update(&db.conn).await.unwrap();

        let stats = StatisticService::dashboard(&db.conn).await.unwrap();

        assert_eq!(stats.new_registrants, 4);
        assert_eq!(stats.total_santri, 5);
        assert_eq!(stats.active_santri, 4);
        assert_eq!(stats.inactive_santri, 1);
        assert_eq!(stats.gender_distribution, GenderDistribution { male: 2, female: 2 });
        assert_eq!(
            stats.yearly_distribution,
            [
                YearlyCount {
                    college_year: "2024".to_string(),
                    total: 2,
                },
                YearlyCount {
                    college_year: "2023".to_string(),
                    total: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_dashboard_serializes_camel_case() {
        let db = TestDb::new().await;

        let stats = StatisticService::dashboard(&db.conn).await.unwrap();
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["totalSantri"], 0);
        assert_eq!(json["genderDistribution"]["male"], 0);
        assert!(json["yearlyDistribution"].as_array().unwrap().is_empty());
    }
}
