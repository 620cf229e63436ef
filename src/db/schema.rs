//! Database Schema
//!
//! SQLite 옵션 테이블 스키마 정의

/// 데이터베이스 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
-- 옵션 테이블 (옵션 이름 1개 = JSON 문서 1개)
CREATE TABLE IF NOT EXISTS options (
    name TEXT PRIMARY KEY,
    value_json TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
