use crate::core::config::{CspConfig, ResolvedSecurity};
use crate::error::CspError;
use crate::render::{
    CspRenderHook, DocumentSections, FragmentGroup, ParsedFragment, RenderContext,
};
use crate::security::nonce::RequestNonce;
use actix_service::{forward_ready, Service, Transform};
use actix_web::{
    body::{to_bytes, BodySize, EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{
        header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    web::Data,
    Error, HttpMessage,
};
use bytes::Bytes;
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

#[derive(Clone)]
pub struct CspNonceMiddleware {
    config: Arc<CspConfig>,
}

impl CspNonceMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> Arc<CspConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspNonceMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspNonceMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspNonceMiddlewareService {
            service: Rc::new(service),
            hook: CspRenderHook::from_config(&self.config),
            config: self.config.clone(),
        }))
    }
}

pub struct CspNonceMiddlewareService<S> {
    service: Rc<S>,
    hook: CspRenderHook,
    config: Arc<CspConfig>,
}

impl<S, B> Service<ServiceRequest> for CspNonceMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let hook = self.hook.clone();
        let config = self.config.clone();

        Box::pin(async move {
            config.stats().increment_request_count();

            let prerendering = config.prerender_probe().is_prerendering(req.request());
            let security = config.resolve(req.path());

            let nonce = if security.nonce && !prerendering {
                match config.generate_nonce() {
                    Ok(nonce) => {
                        req.extensions_mut().insert(RequestNonce(nonce.clone()));
                        Some(nonce)
                    }
                    Err(err) => {
                        log::warn!("Failed to generate request nonce: {}", err);
                        None
                    }
                }
            } else {
                None
            };

            let mut res = service.call(req).await?;

            if !is_html(res.headers()) {
                return Ok(res.map_into_left_body());
            }

            let needs_injection = !prerendering
                && security.policy.is_some()
                && nonce.is_some()
                && carries_body(&res);
            if !needs_injection {
                if let Some(value) = header_only(&hook, nonce, &security, prerendering) {
                    res.headers_mut().insert(CspRenderHook::header_name(), value);
                }
                return Ok(res.map_into_left_body());
            }

            let (http_req, res) = res.into_parts();
            let (mut res, body) = res.into_parts();
            let bytes = to_bytes(body).await.map_err(|err| {
                let err: Box<dyn std::error::Error> = err.into();
                CspError::BodyError(err.to_string())
            })?;

            // Streamed bodies of unknown size can still turn out empty.
            if bytes.is_empty() {
                if let Some(value) = header_only(&hook, nonce, &security, false) {
                    res.headers_mut().insert(CspRenderHook::header_name(), value);
                }
                let res = res.set_body(bytes).map_into_boxed_body();
                return Ok(ServiceResponse::new(http_req, res).map_into_right_body());
            }

            let (body, header) = render_with_nonce(&hook, bytes, nonce, &security);

            if let Some(value) = header {
                res.headers_mut().insert(CspRenderHook::header_name(), value);
            }
            res.headers_mut().remove(CONTENT_LENGTH);

            let res = res.set_body(body).map_into_boxed_body();
            Ok(ServiceResponse::new(http_req, res).map_into_right_body())
        })
    }
}

fn render_with_nonce(
    hook: &CspRenderHook,
    bytes: Bytes,
    nonce: Option<String>,
    security: &ResolvedSecurity,
) -> (Bytes, Option<HeaderValue>) {
    let html = match std::str::from_utf8(&bytes) {
        Ok(html) => html,
        Err(err) => {
            log::warn!("HTML response is not valid UTF-8, nonce not injected: {}", err);
            let mut ctx = RenderContext::<ParsedFragment>::default();
            let header = hook.on_render_html(&mut ctx, security, false);
            return (bytes, header);
        }
    };

    let document =
        DocumentSections::new().with(FragmentGroup::Body, ParsedFragment::parse_document(html));
    let mut ctx = RenderContext::new(document);
    ctx.set_nonce(nonce);

    let header = hook.on_render_html(&mut ctx, security, false);

    let rendered = ctx
        .document()
        .group(FragmentGroup::Body)
        .iter()
        .map(ParsedFragment::render)
        .collect::<Result<String, _>>();

    match rendered {
        Ok(html) => (Bytes::from(html), header),
        Err(err) => {
            log::error!("Failed to render HTML after nonce injection: {}", err);
            (bytes, header)
        }
    }
}

fn header_only(
    hook: &CspRenderHook,
    nonce: Option<String>,
    security: &ResolvedSecurity,
    prerendering: bool,
) -> Option<HeaderValue> {
    let mut ctx = RenderContext::<ParsedFragment>::default();
    ctx.set_nonce(nonce);
    hook.on_render_html(&mut ctx, security, prerendering)
}

/// Responses without a payload (1xx, 204, 304, empty bodies) are never rewritten.
fn carries_body<B: MessageBody>(res: &ServiceResponse<B>) -> bool {
    let status = res.status();
    if status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
    {
        return false;
    }

    !matches!(
        res.response().body().size(),
        BodySize::None | BodySize::Sized(0)
    )
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|content_type| content_type.split(';').next())
        .map_or(false, |essence| essence.trim().eq_ignore_ascii_case("text/html"))
}

#[inline]
pub fn csp_nonce_middleware(config: CspConfig) -> CspNonceMiddleware {
    CspNonceMiddleware::new(config)
}

pub fn configure_csp(config: CspConfig) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::from(config.stats().clone()));
        cfg.app_data(Data::new(config));
    }
}
