use stack_core::error::BackendError;
use stack_core::materials::HemisphereLight;
use stack_core::resources::GeometryBackend;
use stack_core::scene::DrawItem;
use stack_core::shapes::mesh::{MeshData, Vertex};
use stack_core::stage::FrameState;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_view_projection;
uniform mat4 u_model;

out vec3 v_normal;
out vec3 v_world;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    // Models are rotation + translation only, so the upper 3x3 is orthonormal.
    v_normal = mat3(u_model) * a_normal;
    gl_Position = u_view_projection * world;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world;

uniform vec3 u_color;
uniform float u_roughness;
uniform vec3 u_sky;
uniform vec3 u_ground;
uniform float u_light_intensity;
uniform vec3 u_camera_position;

out vec4 out_color;

const float PI = 3.14159265;

vec3 to_linear(vec3 c) { return pow(c, vec3(2.2)); }
vec3 to_srgb(vec3 c) { return pow(c, vec3(1.0 / 2.2)); }

void main() {
    vec3 n = normalize(v_normal) * (gl_FrontFacing ? 1.0 : -1.0);
    vec3 irradiance = mix(to_linear(u_ground), to_linear(u_sky), 0.5 * n.y + 0.5) * u_light_intensity;
    vec3 diffuse = to_linear(u_color) * irradiance / PI;

    // Sky glint along +Y, fading out completely for fully rough surfaces.
    vec3 v = normalize(u_camera_position - v_world);
    vec3 h = normalize(v + vec3(0.0, 1.0, 0.0));
    float a = max(u_roughness * u_roughness, 0.02);
    float shininess = 2.0 / (a * a) - 2.0;
    float specular = pow(max(dot(n, h), 0.0), shininess) * (1.0 - u_roughness) * 0.25;

    out_color = vec4(to_srgb(clamp(diffuse + specular, 0.0, 1.0)), 1.0);
}
"#;

const ATTRIB_POSITION: u32 = 0;
const ATTRIB_NORMAL: u32 = 1;

/// Buffers of one uploaded mesh. The vertex array records both bindings.
#[derive(Clone, Debug)]
pub struct GpuMesh {
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    index_buffer: WebGlBuffer,
    index_count: i32,
}

struct Uniforms {
    view_projection: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    sky: Option<WebGlUniformLocation>,
    ground: Option<WebGlUniformLocation>,
    light_intensity: Option<WebGlUniformLocation>,
    camera_position: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        Self {
            view_projection: gl.get_uniform_location(program, "u_view_projection"),
            model: gl.get_uniform_location(program, "u_model"),
            color: gl.get_uniform_location(program, "u_color"),
            roughness: gl.get_uniform_location(program, "u_roughness"),
            sky: gl.get_uniform_location(program, "u_sky"),
            ground: gl.get_uniform_location(program, "u_ground"),
            light_intensity: gl.get_uniform_location(program, "u_light_intensity"),
            camera_position: gl.get_uniform_location(program, "u_camera_position"),
        }
    }
}

/// WebGL2 geometry store and renderer for the stacked scene.
pub struct WebGlBackend {
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    live_meshes: usize,
}

impl WebGlBackend {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, BackendError> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(js_error)?
            .ok_or_else(|| BackendError::Context("WebGL2 not supported".into()))?
            .dyn_into::<GL>()
            .map_err(|_| BackendError::Context("context is not WebGL2".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let uniforms = Uniforms::locate(&gl, &program);
        gl.enable(GL::DEPTH_TEST);

        Ok(Self {
            gl,
            program,
            uniforms,
            live_meshes: 0,
        })
    }

    pub fn live_meshes(&self) -> usize {
        self.live_meshes
    }

    /// Clear the drawing buffer and draw every item with hemisphere lighting.
    pub fn draw(&self, frame: &FrameState, light: &HemisphereLight, items: &[DrawItem<'_, GpuMesh>]) {
        let gl = &self.gl;
        let u = &self.uniforms;
        let (width, height) = frame.buffer_size;

        gl.viewport(0, 0, width as i32, height as i32);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        gl.uniform_matrix4fv_with_f32_array(
            u.view_projection.as_ref(),
            false,
            &frame.view_projection.to_cols_array(),
        );
        gl.uniform3fv_with_f32_array(u.sky.as_ref(), &light.sky);
        gl.uniform3fv_with_f32_array(u.ground.as_ref(), &light.ground);
        gl.uniform1f(u.light_intensity.as_ref(), light.intensity);
        gl.uniform3fv_with_f32_array(u.camera_position.as_ref(), &frame.camera_position.to_array());

        for item in items {
            gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, &item.model.to_cols_array());
            gl.uniform3fv_with_f32_array(u.color.as_ref(), &item.material.color);
            gl.uniform1f(u.roughness.as_ref(), item.material.roughness);
            gl.bind_vertex_array(Some(&item.geometry.vao));
            gl.draw_elements_with_i32(GL::TRIANGLES, item.geometry.index_count, GL::UNSIGNED_INT, 0);
        }
        gl.bind_vertex_array(None);
    }
}

impl GeometryBackend for WebGlBackend {
    type Handle = GpuMesh;

    fn label(&self) -> &'static str {
        "webgl2"
    }

    fn upload(&mut self, label: &str, mesh: &MeshData) -> Result<GpuMesh, BackendError> {
        let gl = &self.gl;
        let index_count =
            i32::try_from(mesh.indices.len()).map_err(|_| BackendError::Allocation("index buffer"))?;

        let (vao, vertex_buffer, index_buffer) =
            match (gl.create_vertex_array(), gl.create_buffer(), gl.create_buffer()) {
                (Some(vao), Some(vertex_buffer), Some(index_buffer)) => (vao, vertex_buffer, index_buffer),
                (vao, vertex_buffer, index_buffer) => {
                    gl.delete_vertex_array(vao.as_ref());
                    gl.delete_buffer(vertex_buffer.as_ref());
                    gl.delete_buffer(index_buffer.as_ref());
                    return Err(BackendError::Allocation("vertex array and buffers"));
                }
            };

        let stride = std::mem::size_of::<Vertex>() as i32;
        gl.bind_vertex_array(Some(&vao));

        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vertex_buffer));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, mesh.vertex_bytes(), GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(ATTRIB_POSITION);
        gl.vertex_attrib_pointer_with_i32(ATTRIB_POSITION, 3, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(ATTRIB_NORMAL);
        gl.vertex_attrib_pointer_with_i32(ATTRIB_NORMAL, 3, GL::FLOAT, false, stride, 12);

        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        gl.buffer_data_with_u8_array(GL::ELEMENT_ARRAY_BUFFER, mesh.index_bytes(), GL::STATIC_DRAW);

        // Unbind the VAO first so it keeps its element buffer binding.
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        self.live_meshes += 1;
        log::debug!(
            "uploaded {}: {} vertices, {} triangles ({} meshes live)",
            label,
            mesh.vertex_count(),
            mesh.triangle_count(),
            self.live_meshes
        );

        Ok(GpuMesh {
            vao,
            vertex_buffer,
            index_buffer,
            index_count,
        })
    }

    fn release(&mut self, mesh: GpuMesh) {
        self.gl.delete_vertex_array(Some(&mesh.vao));
        self.gl.delete_buffer(Some(&mesh.vertex_buffer));
        self.gl.delete_buffer(Some(&mesh.index_buffer));
        self.live_meshes = self.live_meshes.saturating_sub(1);
    }
}

fn js_error(value: JsValue) -> BackendError {
    BackendError::Context(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader, BackendError> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or(BackendError::Allocation("shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(BackendError::Context(format!("shader compile failed: {info}")));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> Result<WebGlProgram, BackendError> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let program = gl
        .create_program()
        .ok_or(BackendError::Allocation("program"))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);

    // Shaders are no longer needed once linked (or once linking failed).
    gl.delete_shader(Some(&vert));
    gl.delete_shader(Some(&frag));

    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        return Err(BackendError::Context(format!("program link failed: {info}")));
    }
    Ok(program)
}
