//! Success pipeline: body → render → project → final callback.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Result, format};

type Stage<T> = Box<dyn FnOnce(Value) -> Result<T> + Send>;

/// Transforms the body of a successful result into the request's return value.
///
/// Each stage receives the previous stage's output. A pipeline with no stage
/// returns the body unchanged.
///
/// # Example
///
/// ```
/// use hyperion_core::{Pipeline, as_type};
///
/// #[derive(serde::Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// let pipeline = Pipeline::new()
///     .render(as_type::<Point>())
///     .project(|p| Ok(p.x + p.y));
///
/// let sum = pipeline.run(serde_json::json!({"x": 1, "y": 2})).expect("run");
/// assert_eq!(sum, 3);
/// ```
pub struct Pipeline<T> {
    run: Stage<T>,
}

impl Pipeline<Value> {
    /// Identity pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run: Box::new(Ok),
        }
    }
}

impl Default for Pipeline<Value> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Pipeline<T> {
    /// Render stage, usually built with [`as_type`] or [`as_many`].
    #[must_use]
    pub fn render<U, F>(self, render: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        self.then(render)
    }

    /// Project stage, applied to the rendered value.
    #[must_use]
    pub fn project<U, F>(self, project: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        self.then(project)
    }

    /// Final callback, applied to the projected value.
    #[must_use]
    pub fn and_then<U, F>(self, callback: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        self.then(callback)
    }

    fn then<U, F>(self, stage: F) -> Pipeline<U>
    where
        F: FnOnce(T) -> Result<U> + Send + 'static,
    {
        let previous = self.run;
        Pipeline {
            run: Box::new(move |body| previous(body).and_then(stage)),
        }
    }

    /// Run every stage on the body.
    pub fn run(self, body: Value) -> Result<T> {
        (self.run)(body)
    }
}

impl<T> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

/// Render transform deserializing the body into `T`.
pub fn as_type<T: DeserializeOwned + 'static>() -> impl FnOnce(Value) -> Result<T> + Send + 'static {
    format::from_value::<T>
}

/// Render transform deserializing a list body into `Vec<T>`.
pub fn as_many<T: DeserializeOwned + 'static>() -> impl FnOnce(Value) -> Result<Vec<T>> + Send + 'static {
    format::from_value::<Vec<T>>
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Error;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn identity_by_default() {
        let body = json!({"x": 1, "y": 2});
        assert_eq!(Pipeline::new().run(body.clone()).expect("run"), body);
    }

    #[test]
    fn stages_run_in_order() {
        let pipeline = Pipeline::new()
            .render(|body: Value| Ok(body["n"].as_i64().unwrap_or_default()))
            .project(|n| Ok(n * 10))
            .and_then(|n| Ok(format!("got {n}")));
        assert_eq!(pipeline.run(json!({"n": 4})).expect("run"), "got 40");
    }

    #[test]
    fn renders_typed_values() {
        let point = Pipeline::new()
            .render(as_type::<Point>())
            .run(json!({"x": 1, "y": 2}))
            .expect("run");
        assert_eq!(point, Point { x: 1, y: 2 });

        let points = Pipeline::new()
            .render(as_many::<Point>())
            .run(json!([{"x": 1, "y": 2}, {"x": 3, "y": 4}]))
            .expect("run");
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn stage_errors_stop_the_pipeline() {
        let pipeline = Pipeline::new()
            .render(as_type::<Point>())
            .project(|_| -> Result<()> { panic!("must not run") });
        let err = pipeline.run(json!({"x": "one"})).expect_err("render fails");
        assert!(matches!(err, Error::JsonDeserialization { .. }));
    }
}
