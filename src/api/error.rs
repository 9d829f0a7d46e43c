// ==========================================
// 教学计划排课系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误,转换为用户可理解的错误消息
// ==========================================

use crate::engine::orchestrator::PlanningError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 排期错误
    // ==========================================
    /// 区间内无可用课时（用户需调整课表、校历或日期区间,不重试）
    #[error("可用课时为 0: subject={subject}, range={start_date}..={end_date}（请检查课表与校历）")]
    EmptyBudget {
        subject: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("课题生成失败: {0}")]
    TopicProducerError(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问 / 导入 / 配置错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<PlanningError> for ApiError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::EmptyBudget {
                subject,
                start_date,
                end_date,
            } => ApiError::EmptyBudget {
                subject,
                start_date,
                end_date,
            },
            PlanningError::TopicProducer(err) => ApiError::TopicProducerError(format!("{:#}", err)),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(err) => ApiError::from(err),
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_budget_preserved() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err: ApiError = PlanningError::EmptyBudget {
            subject: "STQA".to_string(),
            start_date: date,
            end_date: date,
        }
        .into();
        assert!(matches!(err, ApiError::EmptyBudget { ref subject, .. } if subject == "STQA"));
        assert!(err.to_string().contains("STQA"));
    }

    #[test]
    fn test_repository_errors_mapped() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "TermPlan".to_string(),
            id: "P1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_import_errors_mapped() {
        let err: ApiError = ImportError::FileNotFound("a.csv".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = ImportError::field(3, "weekday", "无法识别的星期: Munday").into();
        assert!(matches!(err, ApiError::ImportError(msg) if msg.contains("Munday")));
    }

    #[test]
    fn test_producer_error_message() {
        let err: ApiError =
            PlanningError::TopicProducer(anyhow::anyhow!("upstream timeout")).into();
        assert!(matches!(err, ApiError::TopicProducerError(msg) if msg.contains("upstream timeout")));
    }
}
