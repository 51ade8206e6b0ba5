#[macro_export]
macro_rules! opt {
    (, $default:ident) => {
        $default
    };
    ($optional:expr, $default:ident) => {
        $optional
    };
}

#[macro_export]
macro_rules! params_internal {
    ($vec:ident, required, $key:expr, $val:expr) => {
        $vec.push(($key, $val.to_string()));
    };
    ($vec:ident, optional, $key:expr, $val:expr) => {
        if let Some(ref v) = $val {
            $vec.push(($key, v.to_string()));
        }
    };
    // Appwrite reads list parameters as `key[0]=..&key[1]=..`
    ($vec:ident, indexed, $key:expr, $val:expr) => {
        for (i, v) in $val.iter().enumerate() {
            $vec.push((format!("{}[{}]", $key, i), v.to_string()));
        }
    };
}

/// Build a list of query parameters for an Appwrite endpoint. Example:
/// ```
/// use aora_util::build_params;
///
/// let width = 2000;
/// let quality: Option<u32> = None;
/// let queries = vec!["limit(7)"];
/// let params = build_params! {
///     required width,
///     optional quality,
///     indexed queries,
///     required project => "aora",
/// };
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! build_params {
    (
        $(
            $kind:ident $name:ident $( => $val:expr )?
        ),+ $(,)?
    ) => {
        {
            let mut params: Vec<(String, String)> = Vec::new();
            $(
                $crate::params_internal!(
                    params,
                    $kind,
                    stringify!($name).to_string(),
                    $crate::opt!($( $val )?, $name)
                );
            )+
            params
        }
    };
}
