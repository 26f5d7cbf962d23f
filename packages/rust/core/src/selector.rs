//! Best-logo selection.
//!
//! Scoring is a best-effort heuristic over the URL and the measured size. It
//! will sometimes prefer a favicon over a real wordmark or keep a partner
//! badge in play; that is accepted.

use logocrawler_shared::{SizePreference, ValidatedLogo};
use url::Url;

/// Keyword lists used by [`LogoSelector::score`]. Matched case-insensitively
/// against the full URL.
#[derive(Debug, Clone)]
pub struct ScoringRules {
    /// Hosts or prefixes identifying the logo-lookup service.
    pub lookup_markers: Vec<String>,
    /// Dashboard, hero, and cover imagery.
    pub dashboard_keywords: Vec<String>,
    /// Social preview images.
    pub social_preview_keywords: Vec<String>,
    /// Partner, certification, and payment brands.
    pub partner_keywords: Vec<String>,
    /// Advertising and promotional material.
    pub ad_keywords: Vec<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            lookup_markers: owned(&["logo.clearbit.com"]),
            dashboard_keywords: owned(&[
                "dashboard",
                "hero",
                "banner",
                "cover",
                "splash",
                "landing",
                "background",
                "screenshot",
                "og-image",
                "facebook",
                "twitter",
                "instagram",
                "linkedin",
                "youtube",
            ]),
            social_preview_keywords: owned(&[
                "og-image",
                "og_image",
                "ogimage",
                "twitter-image",
                "twitter_image",
                "twitter-card",
                "share-image",
                "social-image",
                "social-share",
            ]),
            partner_keywords: owned(&[
                "visa",
                "mastercard",
                "amex",
                "paypal",
                "pci",
                "badge",
                "certif",
                "award",
                "partner",
                "sponsor",
                "bank",
                "trust-seal",
                "norton",
                "mcafee",
            ]),
            ad_keywords: owned(&[
                "promotion",
                "promo",
                "campaign",
                "discount",
                "coupon",
                "offer",
                "advert",
                "testimonial",
            ]),
        }
    }
}

/// Picks the single best logo for an organization.
#[derive(Debug, Clone, Default)]
pub struct LogoSelector {
    rules: ScoringRules,
}

impl LogoSelector {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Heuristic score for one logo; higher is better.
    pub fn score(&self, logo: &ValidatedLogo, prefs: &SizePreference) -> i32 {
        let url = logo.url().to_lowercase();
        let path = Url::parse(logo.url())
            .map(|u| u.path().to_lowercase())
            .unwrap_or_else(|_| url.clone());
        let (width, height) = (logo.width(), logo.height());

        let mut score = if prefs.is_met_by(logo) { 10 } else { -20 };

        score += if contains_any(&url, &self.rules.lookup_markers) {
            15
        } else if path.ends_with("favicon.ico") {
            12
        } else if url.contains("apple-touch-icon") {
            10
        } else if path.ends_with(".svg") {
            8
        } else if path.ends_with(".png") {
            3
        } else {
            0
        };

        if width > 800 || height > 600 || contains_any(&url, &self.rules.dashboard_keywords) {
            score -= 30;
        }
        if contains_any(&url, &self.rules.social_preview_keywords) {
            score -= 25;
        }
        if contains_any(&url, &self.rules.partner_keywords) {
            score -= 40;
        }
        if contains_any(&url, &self.rules.ad_keywords) {
            score -= 35;
        }

        if width == height {
            score += 5;
        }
        if (0.5..=2.0).contains(&logo.aspect_ratio()) {
            score += 3;
        }

        let area = logo.area();
        if (10_000..=100_000).contains(&area) {
            score += 8;
        } else if (1_000..10_000).contains(&area) {
            score += 5;
        } else if area > 100_000 {
            score -= 10;
        }

        if width < 32 || height < 32 {
            score -= 15;
        }

        score
    }

    /// The highest-scoring logo; ties go to the earliest in `logos`.
    pub fn select_best(
        &self,
        logos: &[ValidatedLogo],
        prefs: &SizePreference,
    ) -> Option<ValidatedLogo> {
        let mut best: Option<(&ValidatedLogo, i32)> = None;
        for logo in logos {
            let score = self.score(logo, prefs);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((logo, score));
            }
        }
        best.map(|(logo, _)| logo.clone())
    }

    /// Every logo with its score, in input order.
    pub fn scored<'a>(
        &self,
        logos: &'a [ValidatedLogo],
        prefs: &SizePreference,
    ) -> Vec<(&'a ValidatedLogo, i32)> {
        logos.iter().map(|l| (l, self.score(l, prefs))).collect()
    }
}

/// Move `best` to the front, keeping the rest in their existing order.
pub fn order_best_first(
    mut logos: Vec<ValidatedLogo>,
    best: Option<&ValidatedLogo>,
) -> Vec<ValidatedLogo> {
    if let Some(best) = best {
        if let Some(pos) = logos.iter().position(|l| l.url() == best.url()) {
            let top = logos.remove(pos);
            logos.insert(0, top);
        }
    }
    logos
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFS: SizePreference = SizePreference {
        min_width: 120,
        min_height: 120,
    };

    fn logo(url: &str, w: u32, h: u32) -> ValidatedLogo {
        ValidatedLogo::new(url, w, h).expect("positive dimensions")
    }

    #[test]
    fn well_sized_square_png() {
        let s = LogoSelector::default();
        assert_eq!(s.score(&logo("https://example.com/logo.png", 150, 150), &PREFS), 29);
    }

    #[test]
    fn tiny_below_threshold() {
        let s = LogoSelector::default();
        assert_eq!(s.score(&logo("https://example.com/favicon.png", 20, 20), &PREFS), -24);
    }

    #[test]
    fn lookup_service_bonus() {
        let s = LogoSelector::default();
        let l = logo("https://logo.clearbit.com/example.com", 128, 128);
        assert_eq!(s.score(&l, &PREFS), 41);
    }

    #[test]
    fn favicon_ico_bonus() {
        let s = LogoSelector::default();
        assert_eq!(s.score(&logo("https://example.com/favicon.ico", 32, 32), &PREFS), 5);
    }

    #[test]
    fn apple_touch_icon_bonus() {
        let s = LogoSelector::default();
        let l = logo("https://example.com/apple-touch-icon.png", 180, 180);
        assert_eq!(s.score(&l, &PREFS), 36);
    }

    #[test]
    fn svg_bonus_beats_png() {
        let s = LogoSelector::default();
        let svg = s.score(&logo("https://example.com/brand.svg", 120, 120), &PREFS);
        let png = s.score(&logo("https://example.com/brand.png", 120, 120), &PREFS);
        assert_eq!(svg, 34);
        assert_eq!(png, 29);
    }

    #[test]
    fn type_bonuses_do_not_stack() {
        let s = LogoSelector::default();
        let touch_png = logo("https://example.com/apple-touch-icon.png", 180, 180);
        let touch_svg = logo("https://example.com/icons/apple-touch-icon.svg", 180, 180);
        assert_eq!(s.score(&touch_svg, &PREFS), s.score(&touch_png, &PREFS));

        let lookup_png = logo("https://logo.clearbit.com/example.com/logo.png", 128, 128);
        assert_eq!(s.score(&lookup_png, &PREFS), 41);
    }

    #[test]
    fn hero_banner_is_penalized() {
        let s = LogoSelector::default();
        let l = logo("https://example.com/images/hero-banner.jpg", 1200, 600);
        assert_eq!(s.score(&l, &PREFS), -27);
    }

    #[test]
    fn partner_badge_is_penalized() {
        let s = LogoSelector::default();
        let l = logo("https://example.com/img/visa-badge.png", 100, 60);
        assert_eq!(s.score(&l, &PREFS), -49);
    }

    #[test]
    fn promotional_image_is_penalized() {
        let s = LogoSelector::default();
        let l = logo("https://example.com/promotion/summer-campaign.png", 200, 200);
        assert_eq!(s.score(&l, &PREFS), -6);
    }

    #[test]
    fn og_image_stacks_dashboard_and_social_penalties() {
        let s = LogoSelector::default();
        let l = logo("https://example.com/OG-Image.png", 400, 400);
        assert_eq!(s.score(&l, &PREFS), -44);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(LogoSelector::default().select_best(&[], &PREFS).is_none());
    }

    #[test]
    fn picks_highest_score() {
        let logos = vec![
            logo("https://example.com/favicon.png", 20, 20),
            logo("https://example.com/logo.png", 150, 150),
            logo("https://example.com/images/hero-banner.jpg", 1200, 600),
        ];
        let best = LogoSelector::default().select_best(&logos, &PREFS).unwrap();
        assert_eq!(best.url(), "https://example.com/logo.png");
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let logos = vec![
            logo("https://a.example.com/logo.png", 150, 150),
            logo("https://b.example.com/logo.png", 150, 150),
        ];
        let s = LogoSelector::default();
        for _ in 0..5 {
            let best = s.select_best(&logos, &PREFS).unwrap();
            assert_eq!(best.url(), "https://a.example.com/logo.png");
        }
    }

    #[test]
    fn below_threshold_still_wins_when_alone() {
        let logos = vec![logo("https://example.com/favicon.png", 16, 16)];
        let best = LogoSelector::default().select_best(&logos, &PREFS);
        assert!(best.is_some());
    }

    #[test]
    fn best_first_ordering() {
        let logos = vec![
            logo("https://example.com/a.png", 20, 20),
            logo("https://example.com/b.png", 150, 150),
            logo("https://example.com/c.png", 64, 64),
        ];
        let best = logos[1].clone();
        let ordered = order_best_first(logos, Some(&best));
        let urls: Vec<_> = ordered.iter().map(|l| l.url()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/b.png",
                "https://example.com/a.png",
                "https://example.com/c.png",
            ]
        );
    }
}
