//! Layered PII redaction for message bodies.
//!
//! A [`Redactor`] is an ordered list of [`RewritePass`]es, built once per run
//! from [`CleanOptions`] and the resolved [`IdentityTable`]. Each pass rewrites
//! the output of the previous one:
//!
//! | # | Pass | Marker |
//! |---|------|--------|
//! | 1 | [`KeywordPass`]: user-supplied terms, longest first | `[REDACTED]` |
//! | 2 | [`ParticipantPass`]: known display names (anonymized runs only) | `[User X]` |
//! | 3 | [`SurnamePass`]: surname + 1 or 2 ideographs heuristic | `[NAME_REDACTED]` |
//! | 4 | [`UrlPass`] | `[URL]` |
//! | 5 | [`EmailPass`] | `[EMAIL]` |
//! | 6 | [`NumberPass`]: bare digit runs, then delimited triplets | `[NUM_REDACTED]`, `[PHONE_REDACTED]` |
//! | 7 | [`AddressPass`]: long runs ending in an address unit | `[ADDRESS_REDACTED]` |
//!
//! Markers are pure ASCII, so no later pass can re-match them and running the
//! built-in passes over already-redacted text is a no-op.
//!
//! The name heuristic is best-effort. It trades precision for recall and has
//! known false positives (`我很高兴见到你` loses `高兴见`).
//!
//! ```
//! use chatscrub::core::redact::Redactor;
//!
//! let redactor = Redactor::builtin();
//! assert_eq!(
//!     redactor.redact("mail bob@example.com or see https://example.com/a"),
//!     "mail [EMAIL] or see [URL]"
//! );
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::CleanOptions;
use crate::core::identity::{IdentityTable, OWNER_DISPLAY_NAME};

pub const KEYWORD_MARKER: &str = "[REDACTED]";
pub const NAME_MARKER: &str = "[NAME_REDACTED]";
pub const URL_MARKER: &str = "[URL]";
pub const EMAIL_MARKER: &str = "[EMAIL]";
pub const NUMBER_MARKER: &str = "[NUM_REDACTED]";
pub const PHONE_MARKER: &str = "[PHONE_REDACTED]";
pub const ADDRESS_MARKER: &str = "[ADDRESS_REDACTED]";

/// Common Chinese family-name characters. Duplicates are harmless.
const COMMON_SURNAMES: &str = "李王张刘陈杨赵黄周吴徐孙胡朱高林何郭马罗梁宋郑谢韩唐冯于董萧程曹袁邓许傅沈曾彭吕苏卢蒋蔡贾丁魏薛叶阎余潘杜戴夏钟汪田任姜范方石姚谭廖邹熊金陆郝孔白崔康毛邱秦江史顾侯邵孟龙万段雷钱汤尹黎易常武乔贺赖龚文庞樊兰殷施尤普赫干解牟游景詹安邵葛奚范彭郎鲁韦昌马苗凤花方俞任袁柳酆鲍史唐费岑薛雷贺倪汤滕殷罗毕郝邬安常乐于时傅皮卞齐康伍余元卜顾孟平黄和穆萧尹姚邵湛汪祁毛禹狄米贝明臧计伏成戴谈宋茅庞熊纪舒屈项祝董梁杜阮蓝闵席季麻强贾路娄危江童颜郭梅盛林刁钟徐邱骆高夏蔡田樊胡凌霍虞万支柯昝管卢莫经房裘缪干解应宗丁宣贲邓郁单杭洪包诸左石崔吉钮龚程嵇邢滑裴陆荣翁荀羊於惠家封芮羿储靳汲邴糜松井段富巫乌焦巴弓牧隗山谷车侯宓蓬全郗班仰秋仲伊宫宁仇栾暴甘钭厉戎祖武符刘景詹束龙叶幸司韶郜黎蓟薄印宿白怀蒲台从鄂索咸籍赖卓蔺屠蒙池乔阴鬱胥能苍双闻莘党翟谭贡劳逄姬申扶堵冉宰郦雍郤璩桑桂濮牛寿通边扈燕冀郏浦尚农温别庄晏柴瞿阎充慕连茹习宦艾鱼容向古易慎戈廖庾终暨居衡步都耿满弘匡国文寇广禄阙东欧沃利蔚越夔隆师巩厍聂晁勾敖融冷訾辛阚那简饶空曾毋沙乜养鞠须丰巢关蒯相查后荆红游竺权逯盖益桓公";

/// Ordinary words that start with a surname character.
const COMMON_WORDS: &[&str] = &[
    "没有", "没什么", "没事", "没关系",
    "高兴", "告诉", "高速", "高高兴兴", "高中",
    "明天", "明白", "明星", "明亮", "明确",
    "方方", "方便", "方法", "方向", "方面",
    "大家", "大力", "大声",
    "如果", "如何", "如今",
    "本来", "本人", "本意",
    "和平", "和气", "和睦",
    "文化", "文明", "文章",
    "安安", "安全", "安排", "安静",
    "正常", "正如", "正当",
    "白白", "白色", "白天",
    "毛病", "毛衣",
    "长江", "长长",
    "黄山", "黄色",
    "林业", "林地",
    "天天", "天气", "天然",
    "千万", "千里",
    "金钱", "金色",
    "史诗", "历史",
    "交通", "交流",
    "雷雨", "雷电",
    "云朵", "云彩",
    "花朵", "花草",
];

/// Sentence-final particles marking a fragment rather than a name.
const TRAILING_PARTICLES: &[char] = &['的', '了', '是', '着', '过'];

static SURNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[{COMMON_SURNAMES}][\\x{{4e00}}-\\x{{9fa5}}]{{1,2}}"))
        .expect("surname pattern is valid")
});

static WHITELIST: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| COMMON_WORDS.iter().copied().collect());

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern is valid")
});

// ASCII word boundaries: a digit run glued to an ideograph still counts.
static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)[0-9]{6,}(?-u:\b)").expect("digit pattern is valid"));

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)[0-9]{3,}[- ][0-9]{3,}[- ][0-9]{3,}(?-u:\b)")
        .expect("phone pattern is valid")
});

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{4e00}-\x{9fa5}]{2,}(?:省|市|区|县|街道|路|号|室)")
        .expect("address pattern is valid")
});

/// Address matches at or below this many characters are left alone.
const ADDRESS_MIN_CHARS: usize = 8;

/// One named rewrite step.
pub trait RewritePass: Send + Sync {
    /// Short identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Rewrites `text`, borrowing when nothing changed.
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Replaces user-supplied terms, longest first, as literal text.
#[derive(Debug, Clone)]
pub struct KeywordPass {
    terms: Vec<String>,
}

impl KeywordPass {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.is_empty())
            .collect();
        // Stable: equal-length terms keep their listed order.
        terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        Self { terms }
    }

    /// Terms in application order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl RewritePass for KeywordPass {
    fn name(&self) -> &'static str {
        "keywords"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for term in &self.terms {
            if out.contains(term.as_str()) {
                out = Cow::Owned(out.replace(term.as_str(), KEYWORD_MARKER));
            }
        }
        out
    }
}

/// Replaces known participant display names with `[User X]`.
#[derive(Debug, Clone)]
pub struct ParticipantPass {
    names: Vec<(String, String)>,
}

impl ParticipantPass {
    /// Collects every display name longer than one character, except the
    /// owner placeholder, in first-appearance order.
    pub fn from_identities(identities: &IdentityTable) -> Self {
        let names = identities
            .iter()
            .filter(|p| p.display_name != OWNER_DISPLAY_NAME && p.display_name.chars().count() > 1)
            .map(|p| (p.display_name.clone(), format!("[User {}]", p.alias)))
            .collect();
        Self { names }
    }
}

impl RewritePass for ParticipantPass {
    fn name(&self) -> &'static str {
        "participants"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for (name, marker) in &self.names {
            if out.contains(name.as_str()) {
                out = Cow::Owned(out.replace(name.as_str(), marker));
            }
        }
        out
    }
}

/// Heuristic Chinese personal-name detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurnamePass;

impl SurnamePass {
    /// Whether a candidate token should survive untouched.
    pub fn is_exempt(candidate: &str) -> bool {
        WHITELIST.contains(candidate)
            || candidate
                .chars()
                .next_back()
                .is_some_and(|c| TRAILING_PARTICLES.contains(&c))
    }
}

impl RewritePass for SurnamePass {
    fn name(&self) -> &'static str {
        "surnames"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        SURNAME_RE.replace_all(text, |caps: &Captures| {
            let candidate = &caps[0];
            if Self::is_exempt(candidate) {
                candidate.to_string()
            } else {
                NAME_MARKER.to_string()
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlPass;

impl RewritePass for UrlPass {
    fn name(&self) -> &'static str {
        "urls"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        URL_RE.replace_all(text, URL_MARKER)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailPass;

impl RewritePass for EmailPass {
    fn name(&self) -> &'static str {
        "emails"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        EMAIL_RE.replace_all(text, EMAIL_MARKER)
    }
}

/// Masks 6+ digit runs, then hyphen/space-delimited digit triplets.
///
/// The two rules are not mutually exclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberPass;

impl RewritePass for NumberPass {
    fn name(&self) -> &'static str {
        "numbers"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match DIGIT_RUN_RE.replace_all(text, NUMBER_MARKER) {
            Cow::Borrowed(s) => PHONE_RE.replace_all(s, PHONE_MARKER),
            Cow::Owned(s) => Cow::Owned(PHONE_RE.replace_all(&s, PHONE_MARKER).into_owned()),
        }
    }
}

/// Masks long ideograph runs ending in a province/city/street/room unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressPass;

impl RewritePass for AddressPass {
    fn name(&self) -> &'static str {
        "addresses"
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        ADDRESS_RE.replace_all(text, |caps: &Captures| {
            let candidate = &caps[0];
            if candidate.chars().count() > ADDRESS_MIN_CHARS {
                ADDRESS_MARKER.to_string()
            } else {
                candidate.to_string()
            }
        })
    }
}

/// Ordered pipeline of rewrite passes.
pub struct Redactor {
    passes: Vec<Box<dyn RewritePass>>,
}

impl Redactor {
    /// The five heuristic passes that need no configuration.
    pub fn builtin() -> Self {
        Self {
            passes: builtin_passes(),
        }
    }

    /// Builds the passes a run with `options` needs.
    ///
    /// The keyword pass is included only when keywords are configured, the
    /// participant pass only when users are anonymized.
    pub fn from_options(options: &CleanOptions, identities: &IdentityTable) -> Self {
        let mut passes: Vec<Box<dyn RewritePass>> = Vec::new();

        let keywords = options.keywords();
        if !keywords.is_empty() {
            passes.push(Box::new(KeywordPass::new(keywords)));
        }
        if options.anonymize_users {
            passes.push(Box::new(ParticipantPass::from_identities(identities)));
        }
        passes.extend(builtin_passes());

        tracing::debug!(
            passes = ?passes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "built redactor"
        );
        Self { passes }
    }

    /// Names of the passes, in application order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Runs every pass over `text` in order.
    pub fn redact(&self, text: &str) -> String {
        let mut current = text.to_string();
        for pass in &self.passes {
            let rewritten = match pass.apply(&current) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = rewritten {
                tracing::trace!(pass = pass.name(), "rewrote message body");
                current = s;
            }
        }
        current
    }
}

impl std::fmt::Debug for Redactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redactor")
            .field("passes", &self.pass_names())
            .finish()
    }
}

fn builtin_passes() -> Vec<Box<dyn RewritePass>> {
    vec![
        Box::new(SurnamePass),
        Box::new(UrlPass),
        Box::new(EmailPass),
        Box::new(NumberPass),
        Box::new(AddressPass),
    ]
}
