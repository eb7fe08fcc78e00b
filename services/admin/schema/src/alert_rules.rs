use sea_orm::entity::prelude::*;

/// Threshold rule evaluated against ingested metrics.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "alert_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub metric_type: String,
    pub metric_name: String,
    pub operator: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub threshold: Decimal,
    pub severity: String,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
