use std::io::BufRead;
use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, warn};

use super::{finish_mesh, ImportError, ImportedScene, SceneNode};
use crate::engine::utils::postprocess::Geometry;

/// Triangle lists with one index stream per vertex.
fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

fn load_error(context: &str, err: tobj::LoadError) -> ImportError {
    match err {
        tobj::LoadError::OpenFileFailed | tobj::LoadError::ReadError => {
            ImportError::Io(format!("{context}: {err}"))
        }
        other => ImportError::Parse(format!("{context}: {other}")),
    }
}

pub fn import_file(path: &Path) -> Result<ImportedScene, ImportError> {
    let context = path.display().to_string();
    let (models, materials) =
        tobj::load_obj(path, &load_options()).map_err(|e| load_error(&context, e))?;
    if let Err(e) = materials {
        debug!("{context}: materials ignored ({e})");
    }
    Ok(build_scene(&context, models))
}

/// Parses OBJ text from any reader. `mtllib` statements are ignored.
pub fn import_reader<R: BufRead>(name: &str, reader: &mut R) -> Result<ImportedScene, ImportError> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| load_error(name, e))?;
    Ok(build_scene(name, models))
}

/// One root node with a child per OBJ object or group.
fn build_scene(name: &str, models: Vec<tobj::Model>) -> ImportedScene {
    let mut scene = ImportedScene::default();
    scene.nodes.push(SceneNode {
        name: name.to_string(),
        ..Default::default()
    });
    scene.roots.push(0);

    for model in models {
        let Some(geometry) = read_mesh(&model) else {
            warn!("{name}: object `{}` has no faces, skipped", model.name);
            continue;
        };
        let mesh_index = scene.meshes.len();
        scene.meshes.push(finish_mesh(model.name.clone(), geometry));

        let node_index = scene.nodes.len();
        scene.nodes.push(SceneNode {
            name: model.name,
            meshes: vec![mesh_index],
            children: Vec::new(),
        });
        scene.nodes[0].children.push(node_index);
    }

    debug!("OBJ scene `{name}`: {} meshes", scene.meshes.len());
    scene
}

fn read_mesh(model: &tobj::Model) -> Option<Geometry> {
    let mesh = &model.mesh;
    if mesh.indices.len() < 3 {
        return None;
    }
    let indices = mesh.indices.clone();

    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| Vec3::new(n[0], n[1], n[2]))
        .collect();
    let tex_coords = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| Vec2::new(t[0], t[1]))
        .collect();

    Some(Geometry {
        positions,
        normals,
        tex_coords,
        indices,
    })
}
