// ==========================================
// 留置质量报表系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户友好的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::i18n::t;
use crate::importer::{ImportError, SchemaError};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误（整次运行中止）
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("{dataset} 数据集缺少必需列: {}（请检查列名）", .missing.join(", "))]
    MissingColumns {
        dataset: String,
        missing: Vec<String>,
    },

    // ==========================================
    // 配置错误（状态保持不变）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("配置读写失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 报表与导出
    // ==========================================
    #[error("尚未加载数据集")]
    NoData,

    #[error("导出失败: {0}")]
    ExportError(String),
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::MissingColumns {
            dataset: err.dataset.to_string(),
            missing: err.missing,
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Schema(schema) => schema.into(),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            ConfigError::NotFound { field, key } => {
                ApiError::NotFound(format!("{}中不存在 {}", field, key))
            }
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl ApiError {
    /// 面向终端用户的消息
    ///
    /// 导入失败与缺列两类中止原因按当前语言给出提示，其后附带细节
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ImportError(detail) => format!("{} {}", t("error.file_read"), detail),
            ApiError::MissingColumns { dataset, missing } => {
                format!("{} [{}: {}]", t("error.columns"), dataset, missing.join(", "))
            }
            other => other.to_string(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasetKind;

    #[test]
    fn test_schema_error_becomes_missing_columns() {
        let err: ApiError = ImportError::Schema(SchemaError {
            dataset: DatasetKind::Production,
            missing: vec!["Equipe".to_string(), "Forno/Linha".to_string()],
        })
        .into();

        match &err {
            ApiError::MissingColumns { dataset, missing } => {
                assert_eq!(dataset, "produção");
                assert_eq!(missing.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Equipe, Forno/Linha"));
    }

    #[test]
    fn test_user_message_follows_locale() {
        let _guard = crate::i18n::LOCALE_TEST_LOCK.lock().unwrap();
        let missing = ApiError::MissingColumns {
            dataset: "retidos".to_string(),
            missing: vec!["Motivo".to_string(), "M2 Retido".to_string()],
        };
        let unreadable = ApiError::ImportError("文件不存在: x.csv".to_string());

        crate::i18n::set_locale("pt-BR");
        assert_eq!(
            missing.user_message(),
            "Colunas obrigatórias não encontradas. Verifique os nomes no Excel. [retidos: Motivo, M2 Retido]"
        );
        assert!(unreadable
            .user_message()
            .starts_with("Erro na leitura dos arquivos."));

        crate::i18n::set_locale("en");
        assert!(missing
            .user_message()
            .starts_with("Required columns not found."));
        assert!(unreadable
            .user_message()
            .starts_with("Failed to read the input files."));

        crate::i18n::set_locale("pt-BR");
        assert_eq!(ApiError::NoData.user_message(), ApiError::NoData.to_string());
    }

    #[test]
    fn test_config_invalid_value_becomes_invalid_input() {
        let err: ApiError = ConfigError::InvalidValue {
            field: "target_pct".to_string(),
            message: "超出范围".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
