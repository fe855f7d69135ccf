//! gRPC service clients for `base.v1.Tenancy`, `base.v1.Schema` and `base.v1.Bundle`.
//!
//! Same shape as tonic-build output: each client wraps `tonic::client::Grpc<T>`
//! and is generic over the transport, so it works on a bare `Channel` as well as
//! on an `InterceptedService`.

use tonic::codegen::*;

use crate::proto::*;

/// Issue one unary call on `inner`.
async fn unary<T, Req, Resp>(
    inner: &mut tonic::client::Grpc<T>,
    service: &'static str,
    method: &'static str,
    path: &'static str,
    request: impl tonic::IntoRequest<Req>,
) -> std::result::Result<tonic::Response<Resp>, tonic::Status>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    inner.ready().await.map_err(|e| {
        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
    })?;
    let codec = tonic::codec::ProstCodec::default();
    let path = http::uri::PathAndQuery::from_static(path);
    let mut req = request.into_request();
    req.extensions_mut()
        .insert(GrpcMethod::new(service, method));
    inner.unary(req, path, codec).await
}

/// Client for `base.v1.Tenancy`.
#[derive(Debug, Clone)]
pub struct TenancyClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> TenancyClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    pub async fn create(
        &mut self,
        request: impl tonic::IntoRequest<TenantCreateRequest>,
    ) -> std::result::Result<tonic::Response<TenantCreateResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Tenancy",
            "Create",
            "/base.v1.Tenancy/Create",
            request,
        )
        .await
    }

    pub async fn delete(
        &mut self,
        request: impl tonic::IntoRequest<TenantDeleteRequest>,
    ) -> std::result::Result<tonic::Response<TenantDeleteResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Tenancy",
            "Delete",
            "/base.v1.Tenancy/Delete",
            request,
        )
        .await
    }

    pub async fn list(
        &mut self,
        request: impl tonic::IntoRequest<TenantListRequest>,
    ) -> std::result::Result<tonic::Response<TenantListResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Tenancy",
            "List",
            "/base.v1.Tenancy/List",
            request,
        )
        .await
    }
}

/// Client for `base.v1.Schema`.
#[derive(Debug, Clone)]
pub struct SchemaClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> SchemaClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    pub async fn write(
        &mut self,
        request: impl tonic::IntoRequest<SchemaWriteRequest>,
    ) -> std::result::Result<tonic::Response<SchemaWriteResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Schema",
            "Write",
            "/base.v1.Schema/Write",
            request,
        )
        .await
    }

    pub async fn read(
        &mut self,
        request: impl tonic::IntoRequest<SchemaReadRequest>,
    ) -> std::result::Result<tonic::Response<SchemaReadResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Schema",
            "Read",
            "/base.v1.Schema/Read",
            request,
        )
        .await
    }
}

/// Client for `base.v1.Bundle`.
#[derive(Debug, Clone)]
pub struct BundleClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> BundleClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
{
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    pub async fn write(
        &mut self,
        request: impl tonic::IntoRequest<BundleWriteRequest>,
    ) -> std::result::Result<tonic::Response<BundleWriteResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Bundle",
            "Write",
            "/base.v1.Bundle/Write",
            request,
        )
        .await
    }

    pub async fn read(
        &mut self,
        request: impl tonic::IntoRequest<BundleReadRequest>,
    ) -> std::result::Result<tonic::Response<BundleReadResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Bundle",
            "Read",
            "/base.v1.Bundle/Read",
            request,
        )
        .await
    }

    pub async fn delete(
        &mut self,
        request: impl tonic::IntoRequest<BundleDeleteRequest>,
    ) -> std::result::Result<tonic::Response<BundleDeleteResponse>, tonic::Status> {
        unary(
            &mut self.inner,
            "base.v1.Bundle",
            "Delete",
            "/base.v1.Bundle/Delete",
            request,
        )
        .await
    }
}
