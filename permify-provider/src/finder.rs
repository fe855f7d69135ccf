//! Tenant lookup over the cursor-paginated tenant list.

use permify_client::proto::Tenant;
use permify_client::PermifyApi;
use tonic::Status;
use tracing::debug;

/// Tenants requested per list call.
pub const PAGE_SIZE: u32 = 100;

/// Where a paged walk stands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    /// No page fetched yet; the first request carries an empty token.
    NotStarted,
    /// More pages remain behind this token.
    Next(String),
    /// The service returned an empty token.
    Exhausted,
}

/// Walks the tenant list one page at a time.
pub struct TenantPages<'a, C: ?Sized> {
    client: &'a C,
    cursor: Cursor,
}

impl<'a, C: PermifyApi + ?Sized> TenantPages<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            cursor: Cursor::NotStarted,
        }
    }

    /// Fetch the next page, or `None` once the list is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Tenant>>, Status> {
        let token = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::NotStarted => String::new(),
            Cursor::Next(token) => token,
            Cursor::Exhausted => return Ok(None),
        };

        let page = self.client.list_tenants(PAGE_SIZE, token).await?;
        debug!(
            "Fetched {} tenant(s), more pages: {}",
            page.tenants.len(),
            !page.continuous_token.is_empty()
        );
        if !page.continuous_token.is_empty() {
            self.cursor = Cursor::Next(page.continuous_token);
        }
        Ok(Some(page.tenants))
    }
}

/// Find a tenant by id.
///
/// Returns `Ok(None)` when every page was scanned without a match. Stops at the
/// first page containing the tenant. Any RPC error aborts the walk.
pub async fn find_tenant<C: PermifyApi + ?Sized>(
    client: &C,
    id: &str,
) -> Result<Option<Tenant>, Status> {
    let mut pages = TenantPages::new(client);
    while let Some(page) = pages.next_page().await? {
        if let Some(tenant) = page.into_iter().find(|t| t.id == id) {
            return Ok(Some(tenant));
        }
    }
    debug!("Tenant {} not found", id);
    Ok(None)
}

/// Collect every tenant across all pages.
pub async fn list_all_tenants<C: PermifyApi + ?Sized>(client: &C) -> Result<Vec<Tenant>, Status> {
    let mut pages = TenantPages::new(client);
    let mut tenants = Vec::new();
    while let Some(page) = pages.next_page().await? {
        tenants.extend(page);
    }
    Ok(tenants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::FakePermify;

    #[tokio::test]
    async fn test_target_on_second_page_takes_two_calls() {
        let fake = FakePermify::new();
        fake.add_tenants((0..150).map(|i| format!("tenant-{i}")));

        let tenant = find_tenant(&fake, "tenant-120").await.unwrap().unwrap();
        assert_eq!(tenant.id, "tenant-120");
        assert_eq!(fake.list_tokens(), vec!["".to_string(), "tok2".to_string()]);
    }

    #[tokio::test]
    async fn test_short_circuits_on_first_page() {
        let fake = FakePermify::new();
        fake.add_tenants((0..350).map(|i| format!("tenant-{i}")));

        find_tenant(&fake, "tenant-3").await.unwrap().unwrap();
        assert_eq!(fake.list_tokens().len(), 1);
    }

    #[tokio::test]
    async fn test_absent_tenant_scans_every_page_then_not_found() {
        let fake = FakePermify::new();
        fake.add_tenants((0..250).map(|i| format!("tenant-{i}")));

        let result = find_tenant(&fake, "missing").await.unwrap();
        assert!(result.is_none());
        assert_eq!(fake.list_tokens(), vec!["", "tok2", "tok3"]);
    }

    #[tokio::test]
    async fn test_empty_list_still_issues_one_call() {
        let fake = FakePermify::new();
        assert!(find_tenant(&fake, "").await.unwrap().is_none());
        assert_eq!(fake.list_tokens(), vec![""]);
    }

    #[tokio::test]
    async fn test_list_error_aborts() {
        let fake = FakePermify::new();
        fake.add_tenants((0..150).map(|i| format!("tenant-{i}")));
        fake.fail_list_at(2, Status::unavailable("connection reset"));

        let err = find_tenant(&fake, "missing").await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::Unavailable);
        assert_eq!(fake.list_tokens().len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_collects_every_page() {
        let fake = FakePermify::new();
        fake.add_tenants((0..201).map(|i| format!("tenant-{i}")));

        let tenants = list_all_tenants(&fake).await.unwrap();
        assert_eq!(tenants.len(), 201);
        assert_eq!(tenants[200].id, "tenant-200");
    }
}
