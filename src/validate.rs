//! 请求校验
//!
//! 按声明顺序检查必填字段，再用常量时间比较校验共享密钥。

use serde_json::{Map, Value};
use subtle::ConstantTimeEq;

use crate::error::RelayError;

/// 请求体中可能出现的字段，声明顺序即检查顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Token,
    Location,
    Date,
    RequesterName,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Token => "token",
            Field::Location => "location",
            Field::Date => "date",
            Field::RequesterName => "requester_name",
        }
    }
}

/// 通过校验的预报请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub token: String,
    pub location: String,
    pub date: Option<String>,
    pub requester_name: Option<String>,
}

/// 将原始请求体解析为 JSON 对象
pub fn parse_body(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::InvalidBody("request body is required".into()));
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RelayError::InvalidBody(
            "request body must be a JSON object".into(),
        )),
        Err(e) => Err(RelayError::InvalidBody(format!(
            "request body is not valid JSON: {e}"
        ))),
    }
}

/// 校验请求
///
/// # 参数
///
/// * `body` - 请求体 JSON 对象
/// * `required` - 本端点的必填字段，按检查顺序排列
/// * `secret` - 配置的共享密钥
///
/// # 错误
///
/// - `MissingField`: 第一个缺失（不存在、`null` 或空字符串）的字段
/// - `Unauthorized`: 所有字段齐全但 token 不匹配（非字符串的 token 视为不匹配）
/// - `InvalidField`: token 校验通过后，其余字段存在但不是字符串
pub fn validate(
    body: &Map<String, Value>,
    required: &[Field],
    secret: &str,
) -> Result<ForecastRequest, RelayError> {
    if let Some(field) = required
        .iter()
        .find(|field| is_missing(body.get(field.as_str())))
    {
        return Err(RelayError::MissingField(field.as_str()));
    }

    let token = body
        .get(Field::Token.as_str())
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        return Err(RelayError::Unauthorized);
    }

    let field = |field: Field| -> Result<Option<String>, RelayError> {
        if !required.contains(&field) {
            return Ok(None);
        }
        match body.get(field.as_str()) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            _ => Err(RelayError::InvalidField(field.as_str())),
        }
    };

    Ok(ForecastRequest {
        token: token.to_string(),
        location: field(Field::Location)?.unwrap_or_default(),
        date: field(Field::Date)?,
        requester_name: field(Field::RequesterName)?,
    })
}

/// 不存在、`null` 或空字符串
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
