use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct AuthorizeQuery {
    /// 授权完成后身份提供方回跳的地址
    pub redirect_uri: String,
}

// 用授权码换取令牌
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}
