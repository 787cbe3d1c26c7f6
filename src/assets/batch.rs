use rayon::prelude::*;

use crate::{
    assets::decode::LoadedImage,
    assets::resolve::ImageResolver,
    foundation::error::{ExportError, ExportResult},
    model::config::ExportThreading,
    model::scene::Scene,
};

/// Load every scene image as an independent task and join them in scene order.
///
/// Individual failures are logged and resolve to [`LoadedImage::Unavailable`]; only a thread
/// pool that cannot be built is reported as an error.
#[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
pub fn load_scene_images(
    scenes: &[&Scene],
    resolver: &dyn ImageResolver,
    threading: &ExportThreading,
) -> ExportResult<Vec<LoadedImage>> {
    let images = fan_out(scenes, threading, |_, scene| load_one(scene, resolver))?;
    let missing = images.iter().filter(|i| !i.is_available()).count();
    tracing::debug!(loaded = images.len() - missing, missing, "scene images loaded");
    Ok(images)
}

fn load_one(scene: &Scene, resolver: &dyn ImageResolver) -> LoadedImage {
    let Some(image) = scene.image.as_ref() else {
        return LoadedImage::Unavailable;
    };
    match resolver.resolve(image).and_then(LoadedImage::decode) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!(scene = scene.id, error = %e, "scene image unavailable, drawing placeholder");
            LoadedImage::Unavailable
        }
    }
}

/// Run `f` over `items` on a call-local pool, collecting results by position.
pub(crate) fn fan_out<T, R, F>(
    items: &[T],
    threading: &ExportThreading,
    f: F,
) -> ExportResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync + Send,
{
    threading.validate()?;
    if !threading.parallel || items.len() < 2 {
        return Ok(items.iter().enumerate().map(|(i, t)| f(i, t)).collect());
    }

    let pool = build_thread_pool(threading.threads)?;
    Ok(pool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(i, t)| f(i, t))
            .collect()
    }))
}

fn build_thread_pool(threads: Option<usize>) -> ExportResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ExportError::layout(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/batch.rs"]
mod tests;
