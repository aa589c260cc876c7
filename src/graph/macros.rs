//! Macro for convenient request construction.

/// Builds a [`Request`](crate::graph::Request) with optional named parameters.
///
/// # Usage
///
/// ```ignore
/// use cypher_template::request;
///
/// // Request without parameters
/// let req = request!("MATCH (n:Person) RETURN n");
///
/// // Request with parameters
/// let req = request!(
///     "MATCH (n:Person) WHERE n.name = $name AND n.age > $age RETURN n",
///     name = person_name,
///     age = 30
/// );
/// ```
#[macro_export]
macro_rules! request {
    // Request without parameters
    ($query:expr) => {
        $crate::graph::Request::new($query)
    };
    // Request with parameters
    ($query:expr, $($name:ident = $value:expr),+ $(,)?) => {
        $crate::graph::Request::new($query)$(.param(stringify!($name), $value))+
    };
}
