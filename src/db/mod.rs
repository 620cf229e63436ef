//! Option Store Module
//!
//! 호스트의 key → JSON 문서 저장소 추상화와 구현체 (SQLite, 메모리)

mod schema;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;

use crate::error::SettingsError;

/// 호스트 옵션 저장소
///
/// 옵션 하나는 자체 완결적인 JSON 문서이며, 문서 간 참조는 없습니다.
/// 동시 쓰기 직렬화는 구현체 책임입니다.
pub trait OptionStore: Send + Sync {
    /// 옵션 조회 (없으면 `None`)
    fn get_option(&self, name: &str) -> Result<Option<Value>, SettingsError>;

    /// 옵션 저장 (있으면 덮어씀)
    fn update_option(&self, name: &str, value: &Value) -> Result<(), SettingsError>;

    /// 옵션 삭제 (없어도 성공)
    fn delete_option(&self, name: &str) -> Result<(), SettingsError>;

    /// 없을 때만 저장. 저장했으면 `true`
    fn add_option(&self, name: &str, value: &Value) -> Result<bool, SettingsError> {
        if self.get_option(name)?.is_some() {
            return Ok(false);
        }
        self.update_option(name, value)?;
        Ok(true)
    }
}

/// SQLite 기반 옵션 저장소
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 메모리 DB (테스트/임시 실행용)
    pub fn open_in_memory() -> Result<Self, SettingsError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), SettingsError> {
        self.lock()?.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// 저장된 옵션 이름 목록
    pub fn list_option_names(&self) -> Result<Vec<String>, SettingsError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM options ORDER BY name")?;
        let iter = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for name in iter {
            names.push(name?);
        }
        Ok(names)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SettingsError> {
        self.conn.lock().map_err(|e| {
            SettingsError::Persistence(format!("Failed to acquire database lock: {}", e))
        })
    }
}

impl OptionStore for Database {
    fn get_option(&self, name: &str) -> Result<Option<Value>, SettingsError> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value_json FROM options WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn update_option(&self, name: &str, value: &Value) -> Result<(), SettingsError> {
        let json = serde_json::to_string(value)?;
        self.lock()?.execute(
            "INSERT OR REPLACE INTO options (name, value_json, updated_at) VALUES (?1, ?2, ?3)",
            (name, &json, chrono::Utc::now().timestamp_millis()),
        )?;
        Ok(())
    }

    fn delete_option(&self, name: &str) -> Result<(), SettingsError> {
        self.lock()?
            .execute("DELETE FROM options WHERE name = ?1", [name])?;
        Ok(())
    }
}

/// 메모리 옵션 저장소
#[derive(Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionStore for MemoryOptionStore {
    fn get_option(&self, name: &str) -> Result<Option<Value>, SettingsError> {
        let options = self
            .options
            .read()
            .map_err(|e| SettingsError::Persistence(e.to_string()))?;
        Ok(options.get(name).cloned())
    }

    fn update_option(&self, name: &str, value: &Value) -> Result<(), SettingsError> {
        let mut options = self
            .options
            .write()
            .map_err(|e| SettingsError::Persistence(e.to_string()))?;
        options.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn delete_option(&self, name: &str) -> Result<(), SettingsError> {
        let mut options = self
            .options
            .write()
            .map_err(|e| SettingsError::Persistence(e.to_string()))?;
        options.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_sqlite_option_roundtrip() {
        let dir = tempdir().unwrap();
        let db = Database::new(&dir.path().join("fairfence.db")).unwrap();
        db.initialize().unwrap();

        assert!(db.get_option("fairfence_faq").unwrap().is_none());

        let doc = json!([{ "id": "1", "question": "Q?", "answer": "A." }]);
        db.update_option("fairfence_faq", &doc).unwrap();
        assert_eq!(db.get_option("fairfence_faq").unwrap(), Some(doc));
        assert_eq!(db.list_option_names().unwrap(), vec!["fairfence_faq"]);

        db.delete_option("fairfence_faq").unwrap();
        assert!(db.get_option("fairfence_faq").unwrap().is_none());
    }

    #[test]
    fn test_sqlite_persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("fairfence.db");

        {
            let db = Database::new(&path).unwrap();
            db.initialize().unwrap();
            db.update_option("fairfence_general_settings", &json!({ "phone": "123" }))
                .unwrap();
        }

        let db = Database::new(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(
            db.get_option("fairfence_general_settings").unwrap(),
            Some(json!({ "phone": "123" }))
        );
    }

    #[test]
    fn test_add_option_does_not_overwrite() {
        let sqlite = Database::open_in_memory().unwrap();
        sqlite.initialize().unwrap();
        let stores: Vec<Box<dyn OptionStore>> =
            vec![Box::new(sqlite), Box::new(MemoryOptionStore::new())];

        for store in stores {
            assert!(store.add_option("k", &json!(1)).unwrap());
            assert!(!store.add_option("k", &json!(2)).unwrap());
            assert_eq!(store.get_option("k").unwrap(), Some(json!(1)));
        }
    }
}
