// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录中生成产量/留置 CSV 文件
// ==========================================

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// 标准产量表头
pub const PRODUCTION_HEADER: &str = "Data,Equipe,Forno,Metragem";

/// 标准留置表头
pub const RETENTION_HEADER: &str = "Data,Equipe,Forno,Motivo,M2 Retido";

/// 临时测试数据目录（需要保持存活）
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// 写入文件并返回路径
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// 写入 CSV（表头 + 数据行）
    pub fn csv(&self, name: &str, header: &str, rows: &[&str]) -> PathBuf {
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        self.write(name, &content)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// 边界场景: TeamA 1.00%，TeamB 0.25%，总体 0.50%
pub fn boundary_datasets(fixture: &Fixture) -> (PathBuf, PathBuf) {
    let production = fixture.csv(
        "producao.csv",
        PRODUCTION_HEADER,
        &[
            "05/03/2024,TeamA,F1,1000",
            "12/03/2024,TeamB,F1,2000",
        ],
    );
    let retention = fixture.csv(
        "retidos.csv",
        RETENTION_HEADER,
        &[
            "06/03/2024 08:30,TeamA,F1,Trinca,10",
            "13/03/2024 14:00,TeamB,F1,Risco,5",
        ],
    );
    (production, retention)
}
