// Compiles a pattern once and hands out the same `&'static Regex` afterwards.
// Only ever used with literal patterns, which the tests exercise.
macro_rules! regex(
    ($s:expr) => ({
        static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        RE.get_or_init(|| ::regex::Regex::new($s).unwrap())
    });
);
