//! Volume and mount builders for the initializer
//!
//! Two kinds of volumes are wired up:
//! - the scratch volume, an `emptyDir` shared between the initializer
//!   (read-write) and the user container (read-only) at the same path
//! - for claim-backed sources, a read-only PVC volume staged into the
//!   initializer so the model can be copied out of the claim

use k8s_openapi::api::core::v1::{
    EmptyDirVolumeSource, PersistentVolumeClaimVolumeSource, Volume, VolumeMount,
};

use crate::{MODEL_MOUNT_PATH, PROVISION_VOLUME_NAME, PVC_SOURCE_MOUNT_PATH, PVC_SOURCE_VOLUME_NAME};

/// Build the scratch volume shared between initializer and user container
pub fn provision_volume() -> Volume {
    Volume {
        name: PROVISION_VOLUME_NAME.to_string(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Default::default()
    }
}

/// Build a mount of the scratch volume at the model path.
///
/// The initializer mounts it writable; the user container mounts it
/// read-only. Both see the identical [`MODEL_MOUNT_PATH`].
pub fn provision_mount(read_only: bool) -> VolumeMount {
    VolumeMount {
        name: PROVISION_VOLUME_NAME.to_string(),
        mount_path: MODEL_MOUNT_PATH.to_string(),
        read_only: Some(read_only),
        ..Default::default()
    }
}

/// Build the pod volume referencing a claim-backed model source
pub fn pvc_source_volume(claim_name: &str) -> Volume {
    Volume {
        name: PVC_SOURCE_VOLUME_NAME.to_string(),
        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
            claim_name: claim_name.to_string(),
            read_only: None,
        }),
        ..Default::default()
    }
}

/// Build the read-only initializer mount for a claim-backed source
pub fn pvc_source_mount() -> VolumeMount {
    VolumeMount {
        name: PVC_SOURCE_VOLUME_NAME.to_string(),
        mount_path: PVC_SOURCE_MOUNT_PATH.to_string(),
        read_only: Some(true),
        ..Default::default()
    }
}

/// Rewrite a parsed claim sub-path to its staged location inside the
/// initializer. An empty sub-path maps to the staging path itself, with no
/// trailing separator.
pub fn staged_pvc_path(sub_path: &str) -> String {
    if sub_path.is_empty() {
        PVC_SOURCE_MOUNT_PATH.to_string()
    } else {
        format!("{}/{}", PVC_SOURCE_MOUNT_PATH, sub_path)
    }
}
