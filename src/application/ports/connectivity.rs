use async_trait::async_trait;

/// ネットワーク到達性の確認。実装はプラットフォーム側が提供する。
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}
