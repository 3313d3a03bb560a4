use crate::utils::error::{Result, UpbitError};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

pub type QueryPairs = Vec<(String, String)>;

/// 將請求結構轉成查詢參數。
///
/// 陣列欄位會展開成重複的 key（`states[]=wait&states[]=watch`），
/// `None` 欄位略過。結果依 key 排序，同 key 保留原本順序。
pub fn to_query_pairs<T: Serialize + ?Sized>(value: &T) -> Result<QueryPairs> {
    let object = match serde_json::to_value(value)? {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(UpbitError::validation(format!(
                "Query parameters must come from a struct, got {}",
                value_kind(&other)
            )))
        }
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_to_string(&key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_to_string(&key, other)? {
                    pairs.push((key, text));
                }
            }
        }
    }

    sort_pairs(&mut pairs);
    Ok(pairs)
}

/// stable sort: 重複 key 的值維持原順序
pub fn sort_pairs(pairs: &mut QueryPairs) {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
}

/// 產生送出與簽章共用的查詢字串。
///
/// 值以 form-urlencoded 編碼；`[]` 結尾的 key 保留中括號原樣，
/// 交易所是以這個形式驗證 `query_hash`。
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_key(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// 解析已內嵌在路徑中的查詢字串，例如 `isDetails=true`
pub fn parse_query(raw: &str) -> QueryPairs {
    form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn encode_key(key: &str) -> String {
    match key.strip_suffix("[]") {
        Some(stem) => format!("{}[]", encode_component(stem)),
        None => encode_component(key),
    }
}

fn encode_component(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn scalar_to_string(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(UpbitError::validation(format!(
            "Field '{}' is a nested {}, which cannot be sent as a query parameter",
            key,
            value_kind(&other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
