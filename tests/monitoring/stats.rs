use actix_web_csp_nonce::core::{CspHeaderSerializer, CspPolicy, ResolvedSecurity};
use actix_web_csp_nonce::{
    CspRenderHook, CspStats, DocumentSections, ParsedFragment, PerformanceTimer, RenderContext,
};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_at_zero() {
        let stats = CspStats::new();

        assert_eq!(stats.request_count(), 0);
        assert_eq!(stats.nonce_generation_count(), 0);
        assert_eq!(stats.header_count(), 0);
        assert_eq!(stats.injected_element_count(), 0);
        assert_eq!(stats.avg_header_generation_time_ns(), 0.0);
    }

    #[test]
    fn test_stats_follow_render_hook_outcomes() {
        let stats = Arc::new(CspStats::new());
        let hook = CspRenderHook::new(Arc::new(CspHeaderSerializer), stats.clone());
        let policy: CspPolicy = [("default-src", "'self'")].into_iter().collect();
        let mut ctx = RenderContext::<ParsedFragment>::new(DocumentSections::new());

        hook.on_render_html(&mut ctx, &ResolvedSecurity::new(Some(policy.clone()), false), false);
        hook.on_render_html(&mut ctx, &ResolvedSecurity::new(Some(policy), false), true);
        hook.on_render_html(&mut ctx, &ResolvedSecurity::new(None, false), false);

        assert_eq!(stats.header_count(), 1);
        assert_eq!(stats.prerender_skip_count(), 1);
        assert_eq!(stats.missing_policy_skip_count(), 1);
        assert!(stats.avg_header_generation_time_ns() >= 0.0);
    }

    #[test]
    fn test_stats_reset_and_display() {
        let stats = Arc::new(CspStats::new());
        let hook = CspRenderHook::new(Arc::new(CspHeaderSerializer), stats.clone());
        let mut ctx = RenderContext::<ParsedFragment>::default();
        hook.on_render_html(&mut ctx, &ResolvedSecurity::default(), true);

        let report = stats.to_string();
        assert!(report.contains("Prerender skips: 1"));

        stats.reset();
        assert_eq!(stats.prerender_skip_count(), 0);
    }

    #[test]
    fn test_performance_timer_measures_elapsed_time() {
        let timer = PerformanceTimer::new();
        std::thread::sleep(std::time::Duration::from_millis(2));

        assert!(timer.elapsed().as_millis() >= 2);
        assert!(timer.elapsed_ns() >= 2_000_000);
    }
}
