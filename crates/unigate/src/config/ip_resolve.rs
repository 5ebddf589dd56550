/// Whether this application is running behind Cloudflare
#[derive(Serialize, Deserialize, Clone)]
pub enum ResolveIp {
    /// Use remote IP
    Remote,

    /// Use CF-Connecting-IP header
    Cloudflare,
}

impl Default for ResolveIp {
    fn default() -> ResolveIp {
        ResolveIp::Remote
    }
}
