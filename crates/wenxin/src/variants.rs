use wenxin_model::SamplingParameters;

/// The base URL the paths of all variants are relative to.
pub const DEFAULT_BASE_URL: &str =
    "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop/chat";

/// The variant used when none is specified.
pub const DEFAULT_MODEL: &str = "ernie-4.0-8k";

/// A named ERNIE model and where it is served.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variant {
    /// The public model name.
    pub name: &'static str,
    /// The endpoint path below the base URL.
    pub path: &'static str,
    /// Overrides the single-shot `max_output_tokens` default.
    pub default_max_output_tokens: Option<u32>,
}

/// All known variants.
pub const VARIANTS: &[Variant] = &[
    Variant {
        name: "ernie-4.0-8k",
        path: "completions_pro",
        default_max_output_tokens: None,
    },
    Variant {
        name: "ernie-4.0-8k-preview",
        path: "ernie-4.0-8k-preview",
        default_max_output_tokens: None,
    },
    Variant {
        name: "ernie-4.0-8k-latest",
        path: "ernie-4.0-8k-latest",
        default_max_output_tokens: Some(2048),
    },
];

impl Variant {
    /// Looks up a variant by name, ignoring ASCII case.
    pub fn find(name: &str) -> Option<&'static Variant> {
        VARIANTS
            .iter()
            .find(|variant| variant.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Returns the chat endpoint of this variant below `base_url`.
    pub fn endpoint(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path)
    }

    /// Returns the defaults of single-shot requests.
    pub fn defaults(&self) -> SamplingParameters {
        let mut params = SamplingParameters::default();
        if let Some(max_output_tokens) = self.default_max_output_tokens {
            params.max_output_tokens = max_output_tokens;
        }
        params
    }

    /// Returns the defaults of streaming requests.
    #[inline]
    pub fn stream_defaults(&self) -> SamplingParameters {
        SamplingParameters::streaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find() {
        let pro = Variant::find("ernie-4.0-8k").unwrap();
        assert_eq!(pro.path, "completions_pro");
        assert_eq!(
            Variant::find("ERNIE-4.0-8K-Latest").unwrap().name,
            "ernie-4.0-8k-latest"
        );
        assert!(Variant::find("ernie-bot").is_none());
        assert!(Variant::find(DEFAULT_MODEL).is_some());
    }

    #[test]
    fn test_endpoint() {
        let variant = Variant::find("ernie-4.0-8k-preview").unwrap();
        let expected = "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/\
                        wenxinworkshop/chat/ernie-4.0-8k-preview";
        assert_eq!(variant.endpoint(DEFAULT_BASE_URL), expected);
        assert_eq!(
            variant.endpoint(&format!("{DEFAULT_BASE_URL}/")),
            expected
        );
    }

    #[test]
    fn test_defaults() {
        let latest = Variant::find("ernie-4.0-8k-latest").unwrap();
        assert_eq!(latest.defaults().max_output_tokens, 2048);
        assert_eq!(latest.defaults().temperature, 0.8);

        let pro = Variant::find("ernie-4.0-8k").unwrap();
        assert_eq!(pro.defaults(), SamplingParameters::default());
        assert_eq!(pro.stream_defaults().max_output_tokens, 2048);
    }
}
